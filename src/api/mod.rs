//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Resource endpoints are mounted under `/api/v1`; `/api` and `/health` sit
//! at the root. With the `swagger-ui` feature the OpenAPI document is served
//! at `/api-docs/openapi.json` and browsable at `/swagger-ui`.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI description of every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "FlightSurety oracle simulator",
        description = "Registered oracle identities, simulator events, and flight status requests."
    ),
    paths(
        handlers::system::api_handler,
        handlers::system::health_handler,
        handlers::oracles::list_oracles,
        handlers::oracles::get_oracle,
        handlers::oracles::match_oracles,
        handlers::flights::fetch_flight_status,
        handlers::events::events_handler,
    ),
    components(schemas(
        dto::OracleDto,
        dto::OracleListResponse,
        dto::OracleMatchResponse,
        dto::FetchFlightStatusRequest,
        dto::FetchFlightStatusResponse,
        handlers::system::ApiMessage,
        handlers::system::HealthResponse,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "System", description = "Greeting and health"),
        (name = "Oracles", description = "Registered oracle identities"),
        (name = "Flights", description = "Flight status requests"),
        (name = "Events", description = "Simulator event feed"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}
