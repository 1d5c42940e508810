//! Domain layer: oracle identities, the identity pool, and the event system.
//!
//! This module contains the simulator's own model: account addresses,
//! status codes, registered oracle identities and the append-only pool that
//! holds them, the request/response payloads exchanged with the contract,
//! the process lifecycle, and the event bus that reports every outcome.

pub mod address;
pub mod event_bus;
pub mod identity_pool;
pub mod oracle_identity;
pub mod oracle_request;
pub mod phase;
pub mod simulator_event;
pub mod status_code;

pub use address::{Address, parse_address};
pub use event_bus::EventBus;
pub use identity_pool::IdentityPool;
pub use oracle_identity::OracleIdentity;
pub use oracle_request::{FlightStatusInfo, OracleRequest, OracleResponse};
pub use phase::{Phase, PhaseTracker};
pub use simulator_event::SimulatorEvent;
pub use status_code::StatusCode;
