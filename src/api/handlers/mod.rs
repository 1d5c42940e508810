//! REST endpoint handlers organized by resource.

pub mod events;
pub mod flights;
pub mod oracles;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(oracles::routes())
        .merge(flights::routes())
        .merge(events::routes())
}
