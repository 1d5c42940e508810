//! Flight status requests, oracle responses, and finalized statuses.
//!
//! These mirror the payloads of the contract's `OracleRequest` and
//! `FlightStatusInfo` events and the arguments of `submitOracleResponse`.

use serde::Serialize;

use super::{Address, StatusCode};

/// An `OracleRequest` notification observed on chain.
///
/// Consumed transiently by the dispatcher; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OracleRequest {
    /// Index partition of oracles asked to respond.
    pub index: u8,
    /// Airline operating the flight.
    pub airline: Address,
    /// Flight number.
    pub flight: String,
    /// Scheduled departure as a unix timestamp.
    pub timestamp: u64,
    /// Block the event was emitted in, when known.
    pub block_number: Option<u64>,
}

impl OracleRequest {
    /// Builds the response an oracle submits for this request.
    #[must_use]
    pub fn respond(&self, status_code: StatusCode) -> OracleResponse {
        OracleResponse {
            index: self.index,
            airline: self.airline,
            flight: self.flight.clone(),
            timestamp: self.timestamp,
            status_code,
        }
    }
}

/// Arguments of one `submitOracleResponse` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OracleResponse {
    /// Index from the originating request.
    pub index: u8,
    /// Airline of the flight.
    pub airline: Address,
    /// Flight number.
    pub flight: String,
    /// Scheduled departure as a unix timestamp.
    pub timestamp: u64,
    /// Status the oracle reports.
    pub status_code: StatusCode,
}

/// A `FlightStatusInfo` event: the contract reached consensus on a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlightStatusInfo {
    /// Airline of the flight.
    pub airline: Address,
    /// Flight number.
    pub flight: String,
    /// Scheduled departure as a unix timestamp.
    pub timestamp: u64,
    /// Raw status code agreed on by the oracles.
    pub status: u8,
    /// Block the event was emitted in, when known.
    pub block_number: Option<u64>,
}

impl FlightStatusInfo {
    /// Returns the typed status, if the code is one the simulator knows.
    #[must_use]
    pub const fn status_code(&self) -> Option<StatusCode> {
        StatusCode::from_code(self.status)
    }
}
