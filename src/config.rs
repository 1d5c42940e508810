//! Simulator configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Configuration is read once at startup
//! and never changes afterwards.

use std::net::SocketAddr;
use std::time::Duration;

use crate::domain::{Address, parse_address};
use crate::error::SimulatorError;

/// Top-level simulator configuration.
///
/// Loaded once at startup via [`SimulatorConfig::from_env`].
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Ethereum JSON-RPC endpoint.
    pub rpc_url: String,

    /// Deployed `FlightSuretyApp` contract.
    pub app_address: Address,

    /// Deployed `FlightSuretyData` contract.
    pub data_address: Address,

    /// Number of oracle identities to register.
    pub oracle_count: usize,

    /// Index of the first node account used as an oracle. Lower accounts are
    /// reserved for the owner, airlines, and passengers.
    pub oracle_account_offset: usize,

    /// Index of the node account that owns the data contract.
    pub owner_account_index: usize,

    /// Gas limit attached to every transaction.
    pub gas_limit: u64,

    /// Interval between log polls and between receipt polls.
    pub poll_interval: Duration,

    /// How long to wait for a transaction receipt.
    pub receipt_timeout: Duration,

    /// First block scanned for contract events.
    pub start_block: u64,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,
}

impl SimulatorConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::InvalidConfig`] if a contract address is
    /// missing or malformed, or if `LISTEN_ADDR` cannot be parsed.
    pub fn from_env() -> Result<Self, SimulatorError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`SimulatorConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SimulatorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr: SocketAddr = lookup("LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse()
            .map_err(|e| SimulatorError::InvalidConfig(format!("LISTEN_ADDR: {e}")))?;

        let rpc_url = lookup("RPC_URL").unwrap_or_else(|| "http://127.0.0.1:8545".to_string());

        let app_address = required_address(&lookup, "APP_CONTRACT_ADDRESS")?;
        let data_address = required_address(&lookup, "DATA_CONTRACT_ADDRESS")?;

        let oracle_count = parse_env(&lookup, "ORACLE_COUNT", 20);
        let oracle_account_offset = parse_env(&lookup, "ORACLE_ACCOUNT_OFFSET", 20);
        let owner_account_index = parse_env(&lookup, "OWNER_ACCOUNT_INDEX", 0);
        let gas_limit = parse_env(&lookup, "GAS_LIMIT", 3_000_000);
        let poll_interval = Duration::from_millis(parse_env(&lookup, "POLL_INTERVAL_MS", 1_000));
        let receipt_timeout = Duration::from_secs(parse_env(&lookup, "RECEIPT_TIMEOUT_SECS", 30));
        let start_block = parse_env(&lookup, "START_BLOCK", 0);
        let event_bus_capacity = parse_env(&lookup, "EVENT_BUS_CAPACITY", 10_000);

        Ok(Self {
            listen_addr,
            rpc_url,
            app_address,
            data_address,
            oracle_count,
            oracle_account_offset,
            owner_account_index,
            gas_limit,
            poll_interval,
            receipt_timeout,
            start_block,
            event_bus_capacity,
        })
    }
}

/// Parses a required contract address.
fn required_address<F>(lookup: &F, key: &str) -> Result<Address, SimulatorError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).ok_or_else(|| SimulatorError::InvalidConfig(format!("{key} is not set")))?;
    parse_address(&raw)
        .map_err(|_| SimulatorError::InvalidConfig(format!("{key} is not an address: {raw}")))
}

/// Parses a variable as `T`, returning `default` on missing or invalid
/// values.
fn parse_env<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}
