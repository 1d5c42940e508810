//! Oracle identity DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::OracleIdentity;

/// One registered oracle.
#[derive(Debug, Serialize, ToSchema)]
pub struct OracleDto {
    /// Oracle account address.
    pub address: String,
    /// Indexes assigned by the contract.
    pub indexes: Vec<u8>,
    /// When the oracle joined the pool.
    pub registered_at: DateTime<Utc>,
}

impl From<&OracleIdentity> for OracleDto {
    fn from(identity: &OracleIdentity) -> Self {
        Self {
            address: identity.address().to_string(),
            indexes: identity.indexes().to_vec(),
            registered_at: identity.registered_at(),
        }
    }
}

/// Response body for `GET /oracles`.
#[derive(Debug, Serialize, ToSchema)]
pub struct OracleListResponse {
    /// Registered oracles in registration order.
    pub data: Vec<OracleDto>,
    /// Number of registered oracles.
    pub total: usize,
}

/// Response body for `GET /oracles/match/{index}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct OracleMatchResponse {
    /// Requested index.
    pub index: u8,
    /// Oracles that would answer a request for `index`.
    pub data: Vec<OracleDto>,
}
