//! Flight status request DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /flights/status`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FetchFlightStatusRequest {
    /// Airline address (hex).
    pub airline: String,
    /// Flight number.
    pub flight: String,
    /// Scheduled departure as a unix timestamp.
    pub timestamp: u64,
}

/// Response body for `POST /flights/status` (202 Accepted).
#[derive(Debug, Serialize, ToSchema)]
pub struct FetchFlightStatusResponse {
    /// Hash of the `fetchFlightStatus` transaction.
    pub tx_hash: String,
    /// Request state; oracle responses arrive asynchronously.
    pub status: String,
}
