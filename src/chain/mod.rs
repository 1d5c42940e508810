//! Remote contract layer: the FlightSurety contracts as seen by the simulator.
//!
//! [`OracleContract`] is the only seam between the simulator and the chain.
//! [`FlightSuretyClient`] implements it over Ethereum JSON-RPC for
//! node-managed accounts; tests substitute a scripted in-memory contract.

mod abi;
pub mod client;
pub mod log_stream;
pub mod rpc;

#[cfg(test)]
pub(crate) mod mock;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{Address, FlightStatusInfo, OracleRequest, OracleResponse};
use crate::error::SimulatorError;

pub use client::FlightSuretyClient;
pub use log_stream::{flight_status_stream, oracle_request_stream};
pub use rpc::JsonRpcClient;

pub use alloy_primitives::{TxHash, U256};

/// An amount of ether in wei.
pub type Wei = U256;

/// Operations the simulator needs from the FlightSurety contracts and the
/// node hosting them.
///
/// Every transaction method resolves once the transaction is mined and
/// fails with [`SimulatorError::Reverted`] if it reverted.
#[async_trait]
pub trait OracleContract: Send + Sync + fmt::Debug {
    /// Accounts managed by the node, in node order.
    async fn accounts(&self) -> Result<Vec<Address>, SimulatorError>;

    /// `isOperational()` on the application contract.
    async fn is_operational(&self) -> Result<bool, SimulatorError>;

    /// `authorizeCaller(caller)` on the data contract, sent from `owner`.
    async fn authorize_caller(&self, owner: Address, caller: Address)
    -> Result<TxHash, SimulatorError>;

    /// `REGISTRATION_FEE()` on the application contract.
    async fn registration_fee(&self) -> Result<Wei, SimulatorError>;

    /// `registerOracle()` sent from `oracle`, paying `fee`.
    async fn register_oracle(&self, oracle: Address, fee: Wei) -> Result<TxHash, SimulatorError>;

    /// `getMyIndexes()` called as `oracle`.
    async fn get_my_indexes(&self, oracle: Address) -> Result<Vec<u8>, SimulatorError>;

    /// `submitOracleResponse(...)` sent from `oracle`.
    async fn submit_oracle_response(
        &self,
        oracle: Address,
        response: &OracleResponse,
    ) -> Result<TxHash, SimulatorError>;

    /// `fetchFlightStatus(airline, flight, timestamp)` sent from `from`.
    async fn fetch_flight_status(
        &self,
        from: Address,
        airline: Address,
        flight: &str,
        timestamp: u64,
    ) -> Result<TxHash, SimulatorError>;

    /// Latest block number.
    async fn block_number(&self) -> Result<u64, SimulatorError>;

    /// `OracleRequest` events emitted in `from_block..=to_block`.
    async fn oracle_requests(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<OracleRequest>, SimulatorError>;

    /// `FlightStatusInfo` events emitted in `from_block..=to_block`.
    async fn flight_status_infos(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<FlightStatusInfo>, SimulatorError>;
}
