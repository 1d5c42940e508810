//! Append-only store of registered oracle identities.
//!
//! [`IdentityPool`] is written by the registration coordinator and read by
//! the response dispatcher. The two may run at the same time, so readers can
//! observe a pool that is still growing. Entries are immutable
//! `Arc<OracleIdentity>` values that are only ever appended.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::{Address, OracleIdentity};
use crate::error::SimulatorError;

/// Central store for all registered oracles.
///
/// # Concurrency
///
/// - Any number of readers may filter the pool concurrently.
/// - An append holds the write lock only for the push itself.
/// - There is no removal; the pool lives for the whole process.
#[derive(Debug, Default)]
pub struct IdentityPool {
    inner: RwLock<PoolMembers>,
}

#[derive(Debug, Default)]
struct PoolMembers {
    ordered: Vec<Arc<OracleIdentity>>,
    addresses: HashSet<Address>,
}

impl IdentityPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an identity to the pool.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::DuplicateIdentity`] if an identity with the
    /// same address is already present.
    pub async fn add(&self, identity: OracleIdentity) -> Result<Arc<OracleIdentity>, SimulatorError> {
        let address = identity.address();
        let mut members = self.inner.write().await;
        if !members.addresses.insert(address) {
            return Err(SimulatorError::DuplicateIdentity(address));
        }
        let identity = Arc::new(identity);
        members.ordered.push(Arc::clone(&identity));
        Ok(identity)
    }

    /// Returns, in insertion order, every member holding `index`.
    ///
    /// An empty result is not an error.
    pub async fn matching_members(&self, index: u8) -> Vec<Arc<OracleIdentity>> {
        let members = self.inner.read().await;
        members
            .ordered
            .iter()
            .filter(|identity| identity.holds(index))
            .map(Arc::clone)
            .collect()
    }

    /// Looks up a single member by address.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::OracleNotFound`] if no member has `address`.
    pub async fn get(&self, address: Address) -> Result<Arc<OracleIdentity>, SimulatorError> {
        let members = self.inner.read().await;
        members
            .ordered
            .iter()
            .find(|identity| identity.address() == address)
            .map(Arc::clone)
            .ok_or(SimulatorError::OracleNotFound(address))
    }

    /// Returns every member in insertion order.
    pub async fn list(&self) -> Vec<Arc<OracleIdentity>> {
        self.inner.read().await.ordered.clone()
    }

    /// Returns the number of members.
    pub async fn len(&self) -> usize {
        self.inner.read().await.ordered.len()
    }

    /// Returns `true` if no oracle has been registered yet.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.ordered.is_empty()
    }
}
