//! flightsurety-oracles entry point.
//!
//! Starts the HTTP server, then authorizes the application contract,
//! subscribes to contract events, and registers the oracle pool.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use flightsurety_oracles::api;
use flightsurety_oracles::app_state::AppState;
use flightsurety_oracles::chain::{FlightSuretyClient, OracleContract};
use flightsurety_oracles::config::SimulatorConfig;
use flightsurety_oracles::domain::{EventBus, IdentityPool, PhaseTracker};
use flightsurety_oracles::service::{FlightStatusService, OracleSimulator, SimulatorSettings};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Load configuration
    let config = SimulatorConfig::from_env().context("invalid configuration")?;
    tracing::info!(
        rpc_url = %config.rpc_url,
        app = %config.app_address,
        data = %config.data_address,
        oracles = config.oracle_count,
        "starting flightsurety-oracles"
    );

    // Build domain layer
    let contract: Arc<dyn OracleContract> = Arc::new(FlightSuretyClient::from_config(&config));
    let pool = Arc::new(IdentityPool::new());
    let event_bus = EventBus::new(config.event_bus_capacity);
    let phase = PhaseTracker::new();

    // Build application state
    let app_state = AppState {
        pool: Arc::clone(&pool),
        phase: phase.clone(),
        event_bus: event_bus.clone(),
        flights: Arc::new(FlightStatusService::new(
            Arc::clone(&contract),
            config.owner_account_index,
        )),
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("cannot bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");
    let mut server = tokio::spawn(async move { axum::serve(listener, app).await });

    // Start simulator
    let simulator = OracleSimulator::new(
        contract,
        pool,
        event_bus,
        phase,
        SimulatorSettings::from_config(&config),
    );
    let mut handle = match simulator.start().await {
        Ok(handle) => handle,
        Err(e) => {
            server.abort();
            return Err(e).context("oracle simulator failed to start");
        }
    };
    tracing::info!(
        registered = handle.registration.registered.len(),
        failed = handle.registration.failed.len(),
        "oracle simulator running"
    );

    tokio::select! {
        served = &mut server => {
            served.context("server task panicked")?.context("server error")?;
        }
        () = handle.wait() => {
            tracing::warn!("simulator stopped; shutting down");
            server.abort();
        }
    }

    Ok(())
}
