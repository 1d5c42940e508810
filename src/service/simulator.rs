//! Process orchestration: authorization, the event subscriptions, and the
//! registration batch, in that order.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinSet;

use super::dispatcher::ResponseDispatcher;
use super::registration::{RegistrationCoordinator, RegistrationPlan, RegistrationReport};
use super::status_watcher::watch_flight_statuses;
use crate::chain::{OracleContract, flight_status_stream, oracle_request_stream};
use crate::config::SimulatorConfig;
use crate::domain::{EventBus, IdentityPool, Phase, PhaseTracker, SimulatorEvent};
use crate::error::SimulatorError;

/// Startup parameters of the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorSettings {
    /// Accounts and contract used during registration.
    pub plan: RegistrationPlan,
    /// First block scanned for contract events.
    pub start_block: u64,
    /// Delay between event polls.
    pub poll_interval: Duration,
    /// Fixed seed for status codes; entropy when `None`.
    pub seed: Option<u64>,
}

impl SimulatorSettings {
    /// Derives the settings from the process configuration.
    #[must_use]
    pub const fn from_config(config: &SimulatorConfig) -> Self {
        Self {
            plan: RegistrationPlan {
                owner_index: config.owner_account_index,
                oracle_count: config.oracle_count,
                account_offset: config.oracle_account_offset,
                app_address: config.app_address,
            },
            start_block: config.start_block,
            poll_interval: config.poll_interval,
            seed: None,
        }
    }
}

/// Owns the simulator's components and starts them in order.
#[derive(Debug)]
pub struct OracleSimulator {
    contract: Arc<dyn OracleContract>,
    pool: Arc<IdentityPool>,
    event_bus: EventBus,
    phase: PhaseTracker,
    settings: SimulatorSettings,
}

/// Running simulator: the registration outcome and the background tasks.
#[derive(Debug)]
pub struct SimulatorHandle {
    /// Outcome of the startup registration batch.
    pub registration: RegistrationReport,
    tasks: JoinSet<()>,
}

impl SimulatorHandle {
    /// Waits until a background task stops.
    ///
    /// The event subscriptions run forever, so this normally never returns.
    pub async fn wait(&mut self) {
        if let Some(Err(e)) = self.tasks.join_next().await {
            tracing::error!(error = %e, "simulator task failed");
        }
    }

    /// Stops the background tasks.
    pub async fn shutdown(mut self) {
        self.tasks.shutdown().await;
    }
}

impl OracleSimulator {
    /// Creates a simulator over shared state.
    #[must_use]
    pub fn new(
        contract: Arc<dyn OracleContract>,
        pool: Arc<IdentityPool>,
        event_bus: EventBus,
        phase: PhaseTracker,
        settings: SimulatorSettings,
    ) -> Self {
        Self {
            contract,
            pool,
            event_bus,
            phase,
            settings,
        }
    }

    /// Authorizes the application contract, subscribes to contract events,
    /// and registers the oracle pool.
    ///
    /// The subscriptions start before registration, so requests observed
    /// while the pool is filling are answered by the members present at that
    /// moment. Returns once registration has finished.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::AuthorizationFailed`] if the application
    /// contract cannot be authorized. Nothing is registered or subscribed in
    /// that case.
    pub async fn start(&self) -> Result<SimulatorHandle, SimulatorError> {
        self.probe_operational().await;
        self.enter(Phase::Registering);

        let coordinator = RegistrationCoordinator::new(
            Arc::clone(&self.contract),
            Arc::clone(&self.pool),
            self.event_bus.clone(),
            self.settings.plan,
        );
        let accounts = coordinator.authorize().await.inspect_err(|e| {
            tracing::error!(error = %e, "startup aborted: application contract not authorized");
        })?;

        let mut tasks = JoinSet::new();
        self.spawn_subscriptions(&mut tasks);

        let registration = coordinator.register_all(&accounts).await;
        self.enter(Phase::Dispatching);

        Ok(SimulatorHandle {
            registration,
            tasks,
        })
    }

    async fn probe_operational(&self) {
        match self.contract.is_operational().await {
            Ok(true) => tracing::info!("contract is operational"),
            Ok(false) => tracing::warn!("contract reports it is not operational"),
            Err(e) => tracing::warn!(error = %e, "could not query contract operational status"),
        }
    }

    fn spawn_subscriptions(&self, tasks: &mut JoinSet<()>) {
        let dispatcher = Arc::new(match self.settings.seed {
            Some(seed) => ResponseDispatcher::with_seed(
                Arc::clone(&self.contract),
                Arc::clone(&self.pool),
                self.event_bus.clone(),
                seed,
            ),
            None => ResponseDispatcher::new(
                Arc::clone(&self.contract),
                Arc::clone(&self.pool),
                self.event_bus.clone(),
            ),
        });
        let requests = oracle_request_stream(
            Arc::clone(&self.contract),
            self.settings.start_block,
            self.settings.poll_interval,
        );
        tasks.spawn(dispatcher.run(requests));

        let statuses = flight_status_stream(
            Arc::clone(&self.contract),
            self.settings.start_block,
            self.settings.poll_interval,
        );
        tasks.spawn(watch_flight_statuses(statuses, self.event_bus.clone()));

        tracing::info!(
            start_block = self.settings.start_block,
            "subscribed to oracle requests and flight statuses"
        );
    }

    fn enter(&self, phase: Phase) {
        if self.phase.advance(phase) {
            tracing::info!(%phase, "simulator phase changed");
            let _ = self.event_bus.publish(SimulatorEvent::PhaseChanged {
                phase,
                timestamp: Utc::now(),
            });
        }
    }
}
