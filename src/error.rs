//! Simulator error types with HTTP status code mapping.
//!
//! [`SimulatorError`] is the central error type. Inside the simulator most
//! variants end as a log line (a failed registration, a reverted response);
//! the HTTP layer maps each variant to a status code and a structured JSON
//! body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::chain::TxHash;
use crate::domain::Address;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "oracle not found: 0x…",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see [`SimulatorError`] code ranges).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Simulator error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category             | HTTP Status               |
/// |-----------|----------------------|---------------------------|
/// | 1000–1999 | Validation           | 400 Bad Request           |
/// | 2000–2999 | State / Not Found    | 404 Not Found / 409       |
/// | 3000–3999 | Server / Startup     | 500 Internal Server Error |
/// | 5000–5999 | Remote contract/node | 502 Bad Gateway           |
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    /// HTTP transport to the JSON-RPC node failed.
    #[error("rpc transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The node answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// JSON-RPC error message.
        message: String,
    },

    /// The node answered with something that is not a valid response.
    #[error("malformed rpc response: {0}")]
    MalformedResponse(String),

    /// A transaction was mined but reverted.
    #[error("transaction {tx_hash} reverted")]
    Reverted {
        /// Hash of the reverted transaction.
        tx_hash: TxHash,
    },

    /// No receipt appeared for a transaction in time.
    #[error("no receipt for transaction {tx_hash} after {waited_secs}s")]
    ReceiptTimeout {
        /// Hash of the pending transaction.
        tx_hash: TxHash,
        /// Seconds spent waiting.
        waited_secs: u64,
    },

    /// Contract return data or log data could not be decoded.
    #[error("abi decoding failed: {0}")]
    Abi(String),

    /// A string is not a 20-byte hex address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The identity is already a member of the pool.
    #[error("oracle {0} is already registered in the pool")]
    DuplicateIdentity(Address),

    /// The registry assigned no indexes to an oracle.
    #[error("oracle {0} was assigned no indexes")]
    EmptyIndexes(Address),

    /// No oracle with this address is in the pool.
    #[error("oracle not found: {0}")]
    OracleNotFound(Address),

    /// The node does not manage an account at the requested index.
    #[error("node has no account at index {index} ({available} available)")]
    MissingAccount {
        /// Requested account index.
        index: usize,
        /// Number of accounts the node manages.
        available: usize,
    },

    /// Authorizing the application contract on the data contract failed.
    ///
    /// This is the only fatal startup error.
    #[error("caller authorization failed: {0}")]
    AuthorizationFailed(#[source] Box<SimulatorError>),

    /// Configuration is missing or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SimulatorError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidAddress(_) => 1002,
            Self::OracleNotFound(_) => 2001,
            Self::DuplicateIdentity(_) => 2002,
            Self::EmptyIndexes(_) => 2003,
            Self::Internal(_) => 3000,
            Self::InvalidConfig(_) => 3001,
            Self::AuthorizationFailed(_) => 3002,
            Self::MissingAccount { .. } => 3003,
            Self::Transport(_) => 5001,
            Self::Rpc { .. } => 5002,
            Self::MalformedResponse(_) => 5003,
            Self::Reverted { .. } => 5004,
            Self::ReceiptTimeout { .. } => 5005,
            Self::Abi(_) => 5006,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            Self::OracleNotFound(_) => StatusCode::NOT_FOUND,
            Self::DuplicateIdentity(_) | Self::EmptyIndexes(_) => StatusCode::CONFLICT,
            Self::Internal(_)
            | Self::InvalidConfig(_)
            | Self::AuthorizationFailed(_)
            | Self::MissingAccount { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Transport(_)
            | Self::Rpc { .. }
            | Self::MalformedResponse(_)
            | Self::Reverted { .. }
            | Self::ReceiptTimeout { .. }
            | Self::Abi(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for SimulatorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = SimulatorError::OracleNotFound(Address::ZERO);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2001);
    }

    #[test]
    fn contract_failures_map_to_bad_gateway() {
        let err = SimulatorError::Reverted {
            tx_hash: TxHash::repeat_byte(0xab),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            err.to_string(),
            format!("transaction 0x{} reverted", "ab".repeat(32))
        );
    }

    #[test]
    fn authorization_failure_keeps_cause() {
        let cause = SimulatorError::Rpc {
            code: -32000,
            message: "caller is not contract owner".to_string(),
        };
        let err = SimulatorError::AuthorizationFailed(Box::new(cause));
        assert!(err.to_string().contains("caller is not contract owner"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn into_response_sets_status() {
        let response = SimulatorError::InvalidRequest("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
