//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::{EventBus, IdentityPool, PhaseTracker};
use crate::service::FlightStatusService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registered oracle identities, shared with the simulator.
    pub pool: Arc<IdentityPool>,
    /// Current simulator phase.
    pub phase: PhaseTracker,
    /// Event bus for SSE subscriptions.
    pub event_bus: EventBus,
    /// Operator access to `fetchFlightStatus`.
    pub flights: Arc<FlightStatusService>,
}
