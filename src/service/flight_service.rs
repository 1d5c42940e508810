//! Triggers `fetchFlightStatus` on behalf of the contract owner, so a flight
//! status round can be started without a Dapp.

use std::sync::Arc;

use crate::chain::{OracleContract, TxHash};
use crate::domain::Address;
use crate::error::SimulatorError;

/// Sends flight status requests from the owner account.
#[derive(Debug, Clone)]
pub struct FlightStatusService {
    contract: Arc<dyn OracleContract>,
    owner_account_index: usize,
}

impl FlightStatusService {
    /// Creates a service that sends from node account `owner_account_index`.
    #[must_use]
    pub fn new(contract: Arc<dyn OracleContract>, owner_account_index: usize) -> Self {
        Self {
            contract,
            owner_account_index,
        }
    }

    /// Asks the application contract to open a status request for a flight.
    ///
    /// The contract emits `OracleRequest` for a random index; the dispatcher
    /// picks it up like any other request. The flight number is sent as
    /// given, since it is part of the key the contract hashes.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::InvalidRequest`] for an empty flight number,
    /// [`SimulatorError::MissingAccount`] if the owner account does not exist,
    /// or the transaction error.
    pub async fn fetch_flight_status(
        &self,
        airline: Address,
        flight: &str,
        timestamp: u64,
    ) -> Result<TxHash, SimulatorError> {
        if flight.trim().is_empty() {
            return Err(SimulatorError::InvalidRequest(
                "flight must not be empty".to_string(),
            ));
        }

        let accounts = self.contract.accounts().await?;
        let owner = accounts
            .get(self.owner_account_index)
            .copied()
            .ok_or(SimulatorError::MissingAccount {
                index: self.owner_account_index,
                available: accounts.len(),
            })?;

        let tx_hash = self
            .contract
            .fetch_flight_status(owner, airline, flight, timestamp)
            .await?;
        tracing::info!(%airline, flight, timestamp, %tx_hash, "flight status requested");
        Ok(tx_hash)
    }
}
