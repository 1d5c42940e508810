//! System endpoints: Dapp greeting and health check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::Phase;

/// Fixed greeting returned by `GET /api`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiMessage {
    /// Greeting text.
    pub message: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `healthy` while the server answers.
    pub status: String,
    /// Simulator phase.
    #[schema(value_type = String)]
    pub phase: Phase,
    /// Crate version.
    pub version: String,
    /// Current server time (RFC 3339).
    pub timestamp: String,
}

/// `GET /api`: Fixed informational payload for Dapp clients.
#[utoipa::path(
    get,
    path = "/api",
    tag = "System",
    summary = "Dapp greeting",
    description = "Returns a fixed message. Independent of the simulator state.",
    responses(
        (status = 200, description = "Greeting", body = ApiMessage),
    )
)]
pub async fn api_handler() -> impl IntoResponse {
    Json(ApiMessage {
        message: "An API for use with your Dapp!",
    })
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, simulator phase, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            phase: state.phase.current(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }),
    )
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api", get(api_handler))
        .route("/health", get(health_handler))
}
