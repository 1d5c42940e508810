//! # flightsurety-oracles
//!
//! Oracle network simulator for the FlightSurety flight-insurance contracts.
//!
//! At startup the simulator authorizes the application contract on the data
//! contract, registers a pool of oracle accounts and learns the three indexes
//! the contract assigns to each. It then watches `OracleRequest` events and,
//! for every oracle holding the requested index, submits a random flight
//! status. The contract aggregates the responses; submissions it rejects are
//! expected and only logged.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, SSE)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── OracleSimulator (service/)
//!     │     ├── RegistrationCoordinator
//!     │     ├── ResponseDispatcher
//!     │     └── flight status watcher
//!     ├── EventBus, PhaseTracker (domain/)
//!     │
//!     ├── IdentityPool (domain/)
//!     │
//!     └── OracleContract (chain/)
//!           └── FlightSuretyClient ── JSON-RPC ── Ethereum node
//! ```

pub mod api;
pub mod app_state;
pub mod chain;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
