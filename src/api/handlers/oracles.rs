//! Read-only views of the identity pool.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{OracleDto, OracleListResponse, OracleMatchResponse};
use crate::app_state::AppState;
use crate::domain::parse_address;
use crate::error::{ErrorResponse, SimulatorError};

/// `GET /oracles`: List registered oracles.
#[utoipa::path(
    get,
    path = "/api/v1/oracles",
    tag = "Oracles",
    summary = "List registered oracles",
    description = "Returns every oracle in the pool with its assigned indexes, in registration order.",
    responses(
        (status = 200, description = "Registered oracles", body = OracleListResponse),
    )
)]
pub async fn list_oracles(State(state): State<AppState>) -> impl IntoResponse {
    let data: Vec<OracleDto> = state
        .pool
        .list()
        .await
        .iter()
        .map(|identity| OracleDto::from(&**identity))
        .collect();
    let total = data.len();
    Json(OracleListResponse { data, total })
}

/// `GET /oracles/{address}`: Get one oracle.
///
/// # Errors
///
/// Returns [`SimulatorError::InvalidAddress`] for a malformed address and
/// [`SimulatorError::OracleNotFound`] if the address is not registered.
#[utoipa::path(
    get,
    path = "/api/v1/oracles/{address}",
    tag = "Oracles",
    summary = "Get an oracle",
    description = "Returns the indexes assigned to a registered oracle.",
    params(
        ("address" = String, Path, description = "Oracle account address (hex)"),
    ),
    responses(
        (status = 200, description = "Oracle details", body = OracleDto),
        (status = 400, description = "Malformed address", body = ErrorResponse),
        (status = 404, description = "Oracle not registered", body = ErrorResponse),
    )
)]
pub async fn get_oracle(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, SimulatorError> {
    let address = parse_address(&address)?;
    let identity = state.pool.get(address).await?;
    Ok(Json(OracleDto::from(&*identity)))
}

/// `GET /oracles/match/{index}`: Oracles that would answer a request.
#[utoipa::path(
    get,
    path = "/api/v1/oracles/match/{index}",
    tag = "Oracles",
    summary = "Match oracles by index",
    description = "Returns the oracles holding `index`, i.e. those that submit a response when an OracleRequest for that index arrives.",
    params(
        ("index" = u8, Path, description = "Requested index"),
    ),
    responses(
        (status = 200, description = "Matching oracles", body = OracleMatchResponse),
    )
)]
pub async fn match_oracles(
    State(state): State<AppState>,
    Path(index): Path<u8>,
) -> impl IntoResponse {
    let data = state
        .pool
        .matching_members(index)
        .await
        .iter()
        .map(|identity| OracleDto::from(&**identity))
        .collect();
    Json(OracleMatchResponse { index, data })
}

/// Oracle pool routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/oracles", get(list_oracles))
        .route("/oracles/match/{index}", get(match_oracles))
        .route("/oracles/{address}", get(get_oracle))
}
