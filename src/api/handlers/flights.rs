//! Operator endpoint that opens a flight status request on chain.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{FetchFlightStatusRequest, FetchFlightStatusResponse};
use crate::app_state::AppState;
use crate::domain::parse_address;
use crate::error::{ErrorResponse, SimulatorError};

/// `POST /flights/status`: Trigger `fetchFlightStatus`.
///
/// # Errors
///
/// Returns [`SimulatorError::InvalidAddress`] or
/// [`SimulatorError::InvalidRequest`] for a bad body, and the contract error
/// if the transaction fails.
#[utoipa::path(
    post,
    path = "/api/v1/flights/status",
    tag = "Flights",
    summary = "Request a flight status",
    description = "Sends fetchFlightStatus from the owner account. The contract emits an OracleRequest that the registered oracles answer asynchronously.",
    request_body = FetchFlightStatusRequest,
    responses(
        (status = 202, description = "Request transaction mined", body = FetchFlightStatusResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 502, description = "Contract call failed", body = ErrorResponse),
    )
)]
pub async fn fetch_flight_status(
    State(state): State<AppState>,
    Json(req): Json<FetchFlightStatusRequest>,
) -> Result<impl IntoResponse, SimulatorError> {
    let airline = parse_address(&req.airline)?;
    let tx_hash = state
        .flights
        .fetch_flight_status(airline, &req.flight, req.timestamp)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(FetchFlightStatusResponse {
            tx_hash: tx_hash.to_string(),
            status: "requested".to_string(),
        }),
    ))
}

/// Flight routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/flights/status", post(fetch_flight_status))
}
