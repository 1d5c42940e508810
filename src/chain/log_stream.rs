//! Contract events as endless asynchronous streams.
//!
//! The node is polled with `eth_getLogs` over a block cursor. A failed poll
//! is yielded as an `Err` item and the next poll retries from the same
//! cursor, so a transport drop never ends the stream.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::Stream;
use futures_util::stream;

use super::OracleContract;
use crate::domain::{FlightStatusInfo, OracleRequest};
use crate::error::SimulatorError;

struct PollState<T, F> {
    contract: Arc<dyn OracleContract>,
    fetch: F,
    next_block: u64,
    interval: Duration,
    pending: VecDeque<T>,
    primed: bool,
}

fn poll_logs<T, F, Fut>(
    contract: Arc<dyn OracleContract>,
    start_block: u64,
    interval: Duration,
    fetch: F,
) -> impl Stream<Item = Result<T, SimulatorError>> + Send + 'static
where
    T: Send + 'static,
    F: Fn(Arc<dyn OracleContract>, u64, u64) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Vec<T>, SimulatorError>> + Send + 'static,
{
    let state = PollState {
        contract,
        fetch,
        next_block: start_block,
        interval,
        pending: VecDeque::new(),
        primed: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((Ok(item), state));
            }
            if state.primed {
                tokio::time::sleep(state.interval).await;
            }
            state.primed = true;

            let head = match state.contract.block_number().await {
                Ok(head) => head,
                Err(e) => return Some((Err(e), state)),
            };
            if head < state.next_block {
                continue;
            }

            let fetched = (state.fetch)(Arc::clone(&state.contract), state.next_block, head).await;
            match fetched {
                Ok(items) => {
                    state.next_block = head.saturating_add(1);
                    state.pending.extend(items);
                }
                Err(e) => return Some((Err(e), state)),
            }
        }
    })
}

/// Streams every `OracleRequest` emitted from `start_block` onwards.
pub fn oracle_request_stream(
    contract: Arc<dyn OracleContract>,
    start_block: u64,
    interval: Duration,
) -> impl Stream<Item = Result<OracleRequest, SimulatorError>> + Send + 'static {
    poll_logs(contract, start_block, interval, |contract, from, to| async move {
        contract.oracle_requests(from, to).await
    })
}

/// Streams every `FlightStatusInfo` emitted from `start_block` onwards.
pub fn flight_status_stream(
    contract: Arc<dyn OracleContract>,
    start_block: u64,
    interval: Duration,
) -> impl Stream<Item = Result<FlightStatusInfo, SimulatorError>> + Send + 'static {
    poll_logs(contract, start_block, interval, |contract, from, to| async move {
        contract.flight_status_infos(from, to).await
    })
}
