//! Watches `FlightStatusInfo` events so consensus outcomes show up in the
//! logs and on the event bus.

use chrono::Utc;
use futures_util::{Stream, StreamExt};

use crate::domain::{EventBus, FlightStatusInfo, SimulatorEvent};
use crate::error::SimulatorError;

/// Consumes a `FlightStatusInfo` stream until it ends.
///
/// Stream errors are logged and skipped.
pub async fn watch_flight_statuses<S>(statuses: S, event_bus: EventBus)
where
    S: Stream<Item = Result<FlightStatusInfo, SimulatorError>> + Send,
{
    futures_util::pin_mut!(statuses);

    while let Some(item) = statuses.next().await {
        match item {
            Ok(info) => {
                let status = info
                    .status_code()
                    .map_or_else(|| info.status.to_string(), |code| code.to_string());
                tracing::info!(
                    airline = %info.airline,
                    flight = %info.flight,
                    timestamp = info.timestamp,
                    %status,
                    "flight status finalized"
                );
                let _ = event_bus.publish(SimulatorEvent::FlightStatusFinalized {
                    airline: info.airline,
                    flight: info.flight,
                    flight_timestamp: info.timestamp,
                    status: info.status,
                    timestamp: Utc::now(),
                });
            }
            Err(e) => tracing::error!(error = %e, "flight status subscription error; resubscribing"),
        }
    }

    tracing::warn!("flight status stream ended");
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use futures_util::stream;

    use super::*;
    use crate::chain::mock::mock_address;

    #[tokio::test]
    async fn publishes_finalized_statuses_and_skips_errors() {
        let bus = EventBus::new(10);
        let mut rx = bus.subscribe();
        let items = vec![
            Err(SimulatorError::MalformedResponse("dropped".to_string())),
            Ok(FlightStatusInfo {
                airline: mock_address(200),
                flight: "ND1309".to_string(),
                timestamp: 1_700_000_000,
                status: 20,
                block_number: Some(4),
            }),
        ];

        watch_flight_statuses(stream::iter(items), bus).await;

        let Ok(SimulatorEvent::FlightStatusFinalized { flight, status, .. }) = rx.try_recv() else {
            panic!("expected flight_status_finalized");
        };
        assert_eq!(flight, "ND1309");
        assert_eq!(status, 20);
        assert!(rx.try_recv().is_err());
    }
}
