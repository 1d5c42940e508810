//! Events describing what the simulator did.
//!
//! Every registration, request, and submission outcome is published as a
//! [`SimulatorEvent`] on the [`super::EventBus`]. The HTTP layer streams them
//! to clients; tests subscribe to assert on outcomes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Address, Phase, StatusCode};
use crate::chain::TxHash;

/// Domain event emitted by the registration and dispatch services.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum SimulatorEvent {
    /// The process lifecycle moved forward.
    PhaseChanged {
        /// New phase.
        phase: Phase,
        /// Time of the transition.
        timestamp: DateTime<Utc>,
    },

    /// An oracle registered and joined the pool.
    OracleRegistered {
        /// Oracle account.
        oracle: Address,
        /// Indexes the contract assigned.
        indexes: Vec<u8>,
        /// Registration time.
        timestamp: DateTime<Utc>,
    },

    /// Registering one oracle account failed; it was skipped.
    RegistrationFailed {
        /// Node account index of the candidate.
        account_index: usize,
        /// Candidate account, if the node had one at that index.
        oracle: Option<Address>,
        /// Failure description.
        reason: String,
        /// Failure time.
        timestamp: DateTime<Utc>,
    },

    /// An `OracleRequest` notification was received.
    RequestReceived {
        /// Dispatch round identifier.
        round: Uuid,
        /// Requested index.
        index: u8,
        /// Airline of the flight.
        airline: Address,
        /// Flight number.
        flight: String,
        /// Scheduled departure (unix seconds).
        flight_timestamp: u64,
        /// Number of pool members holding `index`.
        matched: usize,
        /// Time the request was handled.
        timestamp: DateTime<Utc>,
    },

    /// An oracle's response transaction succeeded.
    ResponseSubmitted {
        /// Dispatch round identifier.
        round: Uuid,
        /// Responding oracle.
        oracle: Address,
        /// Requested index.
        index: u8,
        /// Reported status.
        status_code: StatusCode,
        /// Transaction hash.
        tx_hash: TxHash,
        /// Completion time.
        timestamp: DateTime<Utc>,
    },

    /// An oracle's response transaction failed or reverted.
    ResponseRejected {
        /// Dispatch round identifier.
        round: Uuid,
        /// Responding oracle.
        oracle: Address,
        /// Requested index.
        index: u8,
        /// Status the oracle tried to report.
        status_code: StatusCode,
        /// Failure description.
        reason: String,
        /// Completion time.
        timestamp: DateTime<Utc>,
    },

    /// The contract finalized a flight status.
    FlightStatusFinalized {
        /// Airline of the flight.
        airline: Address,
        /// Flight number.
        flight: String,
        /// Scheduled departure (unix seconds).
        flight_timestamp: u64,
        /// Raw status code.
        status: u8,
        /// Time the event was observed.
        timestamp: DateTime<Utc>,
    },
}

impl SimulatorEvent {
    /// Returns the oracle the event concerns, if any.
    #[must_use]
    pub const fn oracle(&self) -> Option<Address> {
        match self {
            Self::OracleRegistered { oracle, .. }
            | Self::ResponseSubmitted { oracle, .. }
            | Self::ResponseRejected { oracle, .. } => Some(*oracle),
            Self::RegistrationFailed { oracle, .. } => *oracle,
            Self::PhaseChanged { .. }
            | Self::RequestReceived { .. }
            | Self::FlightStatusFinalized { .. } => None,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::PhaseChanged { .. } => "phase_changed",
            Self::OracleRegistered { .. } => "oracle_registered",
            Self::RegistrationFailed { .. } => "registration_failed",
            Self::RequestReceived { .. } => "request_received",
            Self::ResponseSubmitted { .. } => "response_submitted",
            Self::ResponseRejected { .. } => "response_rejected",
            Self::FlightStatusFinalized { .. } => "flight_status_finalized",
        }
    }
}
