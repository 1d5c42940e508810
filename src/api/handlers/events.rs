//! Server-sent event feed of simulator activity.

use std::convert::Infallible;
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use futures_util::{Stream, stream};
use tokio::sync::broadcast;

use crate::app_state::AppState;
use crate::domain::SimulatorEvent;

/// `GET /events`: Stream simulator events.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Subscribe to simulator events",
    description = "Server-sent events; each event is named after its `event_type` and carries the JSON-encoded SimulatorEvent.",
    responses(
        (status = 200, description = "Event stream", body = String, content_type = "text/event-stream"),
    )
)]
pub async fn events_handler(State(state): State<AppState>) -> impl IntoResponse {
    Sse::new(event_stream(state.event_bus.subscribe()))
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

/// Turns a bus receiver into SSE frames. Lagging clients skip the events
/// they missed; the stream ends when the bus closes.
fn event_stream(
    rx: broadcast::Receiver<SimulatorEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static {
    stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => match Event::default().event(event.event_type_str()).json_data(&event) {
                    Ok(frame) => return Some((Ok(frame), rx)),
                    Err(e) => tracing::warn!(error = %e, "could not encode simulator event"),
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "sse client lagged behind event bus");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
}

/// Event feed routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/events", get(events_handler))
}
