//! Scripted in-memory contract for tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use alloy_primitives::{B256, U256};

use super::{OracleContract, TxHash, Wei};
use crate::domain::{Address, FlightStatusInfo, OracleRequest, OracleResponse};
use crate::error::SimulatorError;

/// Deterministic address whose last byte is `n`.
pub(crate) fn mock_address(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xaa;
    bytes[19] = n;
    Address::new(bytes)
}

/// Everything the mock knows and everything it was asked to do.
#[derive(Debug, Default)]
pub(crate) struct MockState {
    pub accounts: Vec<Address>,
    pub operational: bool,
    pub fee: Wei,
    pub indexes: HashMap<Address, Vec<u8>>,
    pub fail_authorization: bool,
    pub fail_fee: bool,
    pub failing_registrations: HashSet<Address>,
    pub rejecting_oracles: HashSet<Address>,
    pub failing_polls: usize,
    pub head: u64,
    pub requests: Vec<OracleRequest>,
    pub statuses: Vec<FlightStatusInfo>,

    pub authorizations: Vec<(Address, Address)>,
    pub registrations: Vec<(Address, Wei)>,
    pub index_queries: Vec<Address>,
    pub submissions: Vec<(Address, OracleResponse)>,
    pub fetches: Vec<(Address, Address, String, u64)>,
    next_tx: u64,
}

impl MockState {
    fn tx_hash(&mut self) -> TxHash {
        self.next_tx += 1;
        B256::from(U256::from(self.next_tx))
    }

    fn reverted(&mut self) -> SimulatorError {
        SimulatorError::Reverted {
            tx_hash: self.tx_hash(),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct MockContract {
    state: Mutex<MockState>,
}

impl MockContract {
    /// Node with `count` accounts; account `i` gets indexes `[i, i+1, i+2]`
    /// (mod 10) once registered.
    pub(crate) fn with_accounts(count: u8) -> Self {
        let accounts: Vec<Address> = (0..count).map(mock_address).collect();
        let indexes = accounts
            .iter()
            .zip(0u8..)
            .map(|(a, i)| {
                let base = i % 10;
                (*a, vec![base, (base + 1) % 10, (base + 2) % 10])
            })
            .collect();
        Self {
            state: Mutex::new(MockState {
                accounts,
                operational: true,
                fee: U256::from(1_000_000_000_000_000_000u128),
                indexes,
                ..MockState::default()
            }),
        }
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl OracleContract for MockContract {
    async fn accounts(&self) -> Result<Vec<Address>, SimulatorError> {
        Ok(self.state().accounts.clone())
    }

    async fn is_operational(&self) -> Result<bool, SimulatorError> {
        Ok(self.state().operational)
    }

    async fn authorize_caller(
        &self,
        owner: Address,
        caller: Address,
    ) -> Result<TxHash, SimulatorError> {
        let mut state = self.state();
        state.authorizations.push((owner, caller));
        if state.fail_authorization {
            return Err(state.reverted());
        }
        Ok(state.tx_hash())
    }

    async fn registration_fee(&self) -> Result<Wei, SimulatorError> {
        let state = self.state();
        if state.fail_fee {
            return Err(SimulatorError::Rpc {
                code: -32000,
                message: "fee unavailable".to_string(),
            });
        }
        Ok(state.fee)
    }

    async fn register_oracle(&self, oracle: Address, fee: Wei) -> Result<TxHash, SimulatorError> {
        let mut state = self.state();
        state.registrations.push((oracle, fee));
        if state.failing_registrations.contains(&oracle) || fee < state.fee {
            return Err(state.reverted());
        }
        Ok(state.tx_hash())
    }

    async fn get_my_indexes(&self, oracle: Address) -> Result<Vec<u8>, SimulatorError> {
        let mut state = self.state();
        state.index_queries.push(oracle);
        state
            .indexes
            .get(&oracle)
            .cloned()
            .ok_or_else(|| SimulatorError::Rpc {
                code: -32000,
                message: "Not registered as an oracle".to_string(),
            })
    }

    async fn submit_oracle_response(
        &self,
        oracle: Address,
        response: &OracleResponse,
    ) -> Result<TxHash, SimulatorError> {
        let mut state = self.state();
        state.submissions.push((oracle, response.clone()));
        if state.rejecting_oracles.contains(&oracle) {
            return Err(state.reverted());
        }
        Ok(state.tx_hash())
    }

    async fn fetch_flight_status(
        &self,
        from: Address,
        airline: Address,
        flight: &str,
        timestamp: u64,
    ) -> Result<TxHash, SimulatorError> {
        let mut state = self.state();
        state
            .fetches
            .push((from, airline, flight.to_string(), timestamp));
        Ok(state.tx_hash())
    }

    async fn block_number(&self) -> Result<u64, SimulatorError> {
        Ok(self.state().head)
    }

    async fn oracle_requests(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<OracleRequest>, SimulatorError> {
        let mut state = self.state();
        if state.failing_polls > 0 {
            state.failing_polls -= 1;
            return Err(SimulatorError::MalformedResponse(
                "connection reset".to_string(),
            ));
        }
        Ok(state
            .requests
            .iter()
            .filter(|r| {
                r.block_number
                    .is_some_and(|b| (from_block..=to_block).contains(&b))
            })
            .cloned()
            .collect())
    }

    async fn flight_status_infos(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<FlightStatusInfo>, SimulatorError> {
        Ok(self
            .state()
            .statuses
            .iter()
            .filter(|s| {
                s.block_number
                    .is_some_and(|b| (from_block..=to_block).contains(&b))
            })
            .cloned()
            .collect())
    }
}
