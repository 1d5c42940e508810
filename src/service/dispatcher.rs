//! Response dispatcher: answers each `OracleRequest` with one submission per
//! matching pool member.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use futures_util::{Stream, StreamExt};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tokio::task::{JoinError, JoinSet};
use uuid::Uuid;

use crate::chain::{OracleContract, TxHash};
use crate::domain::{
    Address, EventBus, IdentityPool, OracleRequest, SimulatorEvent, StatusCode,
};
use crate::error::SimulatorError;

/// Outcome of one oracle's submission within a round.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionRecord {
    /// Responding oracle.
    pub oracle: Address,
    /// Status code it reported.
    pub status_code: StatusCode,
    /// Transaction hash when the submission was accepted.
    pub tx_hash: Option<TxHash>,
    /// Failure description when it was rejected.
    pub error: Option<String>,
}

/// Outcome of one dispatch round.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    /// Round identifier, shared by the round's events.
    pub round: Uuid,
    /// Requested index.
    pub index: u8,
    /// Pool members holding the index.
    pub matched: usize,
    /// Submissions the contract accepted.
    pub accepted: usize,
    /// Submissions that failed or reverted.
    pub rejected: usize,
    /// Per-oracle outcomes, in completion order.
    pub submissions: Vec<SubmissionRecord>,
}

/// Reacts to oracle requests with randomly chosen status codes.
///
/// Each request starts a round. The pool is filtered by the requested index,
/// every match draws its own status code, and all submissions run
/// concurrently. A failed submission never affects its siblings, and the
/// contract decides whether any response is accepted.
#[derive(Debug)]
pub struct ResponseDispatcher {
    contract: Arc<dyn OracleContract>,
    pool: Arc<IdentityPool>,
    event_bus: EventBus,
    rng: Mutex<StdRng>,
}

impl ResponseDispatcher {
    /// Creates a dispatcher with an entropy-seeded generator.
    #[must_use]
    pub fn new(contract: Arc<dyn OracleContract>, pool: Arc<IdentityPool>, event_bus: EventBus) -> Self {
        Self::with_rng(contract, pool, event_bus, StdRng::from_entropy())
    }

    /// Creates a dispatcher whose status codes are reproducible.
    #[must_use]
    pub fn with_seed(
        contract: Arc<dyn OracleContract>,
        pool: Arc<IdentityPool>,
        event_bus: EventBus,
        seed: u64,
    ) -> Self {
        Self::with_rng(contract, pool, event_bus, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        contract: Arc<dyn OracleContract>,
        pool: Arc<IdentityPool>,
        event_bus: EventBus,
        rng: StdRng,
    ) -> Self {
        Self {
            contract,
            pool,
            event_bus,
            rng: Mutex::new(rng),
        }
    }

    fn draw_status(&self) -> StatusCode {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        StatusCode::random(&mut *rng)
    }

    /// Handles one request and waits for every submission to complete.
    ///
    /// Pool members are taken as they are at the moment of the call; an
    /// empty match is a normal outcome with nothing submitted.
    pub async fn dispatch(&self, request: &OracleRequest) -> DispatchReport {
        let round = Uuid::new_v4();
        let members = self.pool.matching_members(request.index).await;

        tracing::info!(
            %round,
            index = request.index,
            airline = %request.airline,
            flight = %request.flight,
            timestamp = request.timestamp,
            matched = members.len(),
            "oracle request received"
        );
        let _ = self.event_bus.publish(SimulatorEvent::RequestReceived {
            round,
            index: request.index,
            airline: request.airline,
            flight: request.flight.clone(),
            flight_timestamp: request.timestamp,
            matched: members.len(),
            timestamp: Utc::now(),
        });

        let mut submissions = JoinSet::new();
        for member in &members {
            let oracle = member.address();
            let response = request.respond(self.draw_status());
            let contract = Arc::clone(&self.contract);
            submissions.spawn(async move {
                let result = contract.submit_oracle_response(oracle, &response).await;
                (oracle, response.status_code, result)
            });
        }

        let mut report = DispatchReport {
            round,
            index: request.index,
            matched: members.len(),
            accepted: 0,
            rejected: 0,
            submissions: Vec::with_capacity(members.len()),
        };

        while let Some(joined) = submissions.join_next().await {
            match joined {
                Ok((oracle, status_code, result)) => {
                    let record = self.record_submission(round, request, oracle, status_code, result);
                    if record.error.is_some() {
                        report.rejected += 1;
                    } else {
                        report.accepted += 1;
                    }
                    report.submissions.push(record);
                }
                Err(e) => {
                    report.rejected += 1;
                    tracing::error!(%round, error = %e, "submission task aborted");
                }
            }
        }

        tracing::debug!(
            %round,
            accepted = report.accepted,
            rejected = report.rejected,
            "dispatch round finished"
        );
        report
    }

    fn record_submission(
        &self,
        round: Uuid,
        request: &OracleRequest,
        oracle: Address,
        status_code: StatusCode,
        result: Result<TxHash, SimulatorError>,
    ) -> SubmissionRecord {
        match result {
            Ok(tx_hash) => {
                tracing::info!(
                    %round,
                    %oracle,
                    index = request.index,
                    flight = %request.flight,
                    %status_code,
                    %tx_hash,
                    "oracle response submitted"
                );
                let _ = self.event_bus.publish(SimulatorEvent::ResponseSubmitted {
                    round,
                    oracle,
                    index: request.index,
                    status_code,
                    tx_hash,
                    timestamp: Utc::now(),
                });
                SubmissionRecord {
                    oracle,
                    status_code,
                    tx_hash: Some(tx_hash),
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(
                    %round,
                    %oracle,
                    index = request.index,
                    flight = %request.flight,
                    %status_code,
                    error = %e,
                    "oracle response rejected"
                );
                let _ = self.event_bus.publish(SimulatorEvent::ResponseRejected {
                    round,
                    oracle,
                    index: request.index,
                    status_code,
                    reason: e.to_string(),
                    timestamp: Utc::now(),
                });
                SubmissionRecord {
                    oracle,
                    status_code,
                    tx_hash: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Consumes a request stream until it ends.
    ///
    /// Every request is dispatched in its own task so a slow round never
    /// delays the next notification. Stream errors are logged and skipped.
    pub async fn run<S>(self: Arc<Self>, requests: S)
    where
        S: Stream<Item = Result<OracleRequest, SimulatorError>> + Send,
    {
        futures_util::pin_mut!(requests);
        let mut rounds = JoinSet::new();

        while let Some(item) = requests.next().await {
            while let Some(outcome) = rounds.try_join_next() {
                reap_round(outcome);
            }

            match item {
                Ok(request) => {
                    let dispatcher = Arc::clone(&self);
                    rounds.spawn(async move {
                        dispatcher.dispatch(&request).await;
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "oracle request subscription error; resubscribing");
                }
            }
        }

        tracing::warn!("oracle request stream ended");
        while let Some(outcome) = rounds.join_next().await {
            reap_round(outcome);
        }
    }
}

/// Logs a dispatch task that panicked or was cancelled.
fn reap_round(outcome: Result<(), JoinError>) {
    if let Err(e) = outcome {
        tracing::error!(error = %e, "dispatch round failed");
    }
}
