//! Service layer: the oracle lifecycle.
//!
//! [`RegistrationCoordinator`] fills the [`crate::domain::IdentityPool`] at
//! startup, [`ResponseDispatcher`] answers `OracleRequest` events from it, and
//! [`OracleSimulator`] wires both to the contract event streams. Outcomes are
//! published on the [`crate::domain::EventBus`].

pub mod dispatcher;
pub mod flight_service;
pub mod registration;
pub mod simulator;
pub mod status_watcher;

pub use dispatcher::{DispatchReport, ResponseDispatcher, SubmissionRecord};
pub use flight_service::FlightStatusService;
pub use registration::{
    RegistrationCoordinator, RegistrationFailure, RegistrationPlan, RegistrationReport,
};
pub use simulator::{OracleSimulator, SimulatorHandle, SimulatorSettings};
pub use status_watcher::watch_flight_statuses;
