//! A registered oracle: an account plus the indexes the contract assigned it.

use chrono::{DateTime, Utc};

use super::Address;
use crate::error::SimulatorError;

/// One oracle identity in the [`super::IdentityPool`].
///
/// Created once after a successful `registerOracle` transaction and
/// immutable thereafter. The pool shares identities behind `Arc`, so a
/// reader never observes a partially built value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleIdentity {
    address: Address,
    indexes: Vec<u8>,
    registered_at: DateTime<Utc>,
}

impl OracleIdentity {
    /// Creates an identity from the indexes returned by `getMyIndexes`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::EmptyIndexes`] if `indexes` is empty.
    pub fn new(address: Address, indexes: Vec<u8>) -> Result<Self, SimulatorError> {
        if indexes.is_empty() {
            return Err(SimulatorError::EmptyIndexes(address));
        }
        Ok(Self {
            address,
            indexes,
            registered_at: Utc::now(),
        })
    }

    /// Account the oracle signs responses with.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Indexes assigned by the contract, in the order it returned them.
    #[must_use]
    pub fn indexes(&self) -> &[u8] {
        &self.indexes
    }

    /// Time the identity joined the pool.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Returns `true` if this oracle may answer requests for `index`.
    #[must_use]
    pub fn holds(&self, index: u8) -> bool {
        self.indexes.contains(&index)
    }
}
