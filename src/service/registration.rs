//! Registration coordinator: authorizes the application contract and brings
//! the identity pool from empty to populated.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::chain::{OracleContract, Wei};
use crate::domain::{Address, EventBus, IdentityPool, OracleIdentity, SimulatorEvent};
use crate::error::SimulatorError;

/// Which node accounts take which role during registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationPlan {
    /// Index of the account that owns the data contract.
    pub owner_index: usize,
    /// Number of oracles to register.
    pub oracle_count: usize,
    /// Index of the first oracle account.
    pub account_offset: usize,
    /// Application contract to authorize on the data contract.
    pub app_address: Address,
}

/// One account that could not be registered.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationFailure {
    /// Node account index of the candidate.
    pub account_index: usize,
    /// Candidate address, if the node has an account at that index.
    pub oracle: Option<Address>,
    /// Failure description.
    pub reason: String,
}

/// Outcome of a registration batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistrationReport {
    /// Number of oracles the plan asked for.
    pub requested: usize,
    /// Oracles that joined the pool.
    pub registered: Vec<Address>,
    /// Candidates that were skipped.
    pub failed: Vec<RegistrationFailure>,
}

/// Drives the one-time oracle setup.
///
/// Registration runs identity by identity so the node never sees competing
/// transactions for the same startup batch. A failure on one identity is
/// logged and skipped; only [`RegistrationCoordinator::authorize`] can fail
/// the whole startup.
#[derive(Debug, Clone)]
pub struct RegistrationCoordinator {
    contract: Arc<dyn OracleContract>,
    pool: Arc<IdentityPool>,
    event_bus: EventBus,
    plan: RegistrationPlan,
}

impl RegistrationCoordinator {
    /// Creates a coordinator for `plan`.
    #[must_use]
    pub fn new(
        contract: Arc<dyn OracleContract>,
        pool: Arc<IdentityPool>,
        event_bus: EventBus,
        plan: RegistrationPlan,
    ) -> Self {
        Self {
            contract,
            pool,
            event_bus,
            plan,
        }
    }

    /// Returns the plan this coordinator executes.
    #[must_use]
    pub const fn plan(&self) -> &RegistrationPlan {
        &self.plan
    }

    /// Authorizes the application contract to call the data contract.
    ///
    /// Returns the node's accounts for the registration step.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::AuthorizationFailed`] if the accounts cannot
    /// be listed, the owner account does not exist, or the transaction fails.
    /// No registration can succeed afterwards, so callers should stop.
    pub async fn authorize(&self) -> Result<Vec<Address>, SimulatorError> {
        let fatal = |e: SimulatorError| SimulatorError::AuthorizationFailed(Box::new(e));

        let accounts = self.contract.accounts().await.map_err(fatal)?;
        let owner = accounts
            .get(self.plan.owner_index)
            .copied()
            .ok_or_else(|| {
                fatal(SimulatorError::MissingAccount {
                    index: self.plan.owner_index,
                    available: accounts.len(),
                })
            })?;

        let tx_hash = self
            .contract
            .authorize_caller(owner, self.plan.app_address)
            .await
            .map_err(fatal)?;

        tracing::info!(
            %owner,
            caller = %self.plan.app_address,
            %tx_hash,
            "application contract authorized on data contract"
        );
        Ok(accounts)
    }

    /// Registers every planned oracle account, sequentially.
    ///
    /// The fee is read once and reused. Failures are recorded in the report
    /// and never abort the batch.
    pub async fn register_all(&self, accounts: &[Address]) -> RegistrationReport {
        let mut report = RegistrationReport {
            requested: self.plan.oracle_count,
            ..RegistrationReport::default()
        };

        let fee = match self.contract.registration_fee().await {
            Ok(fee) => fee,
            Err(e) => {
                tracing::error!(error = %e, "could not read registration fee; no oracle registered");
                for account_index in self.account_indexes() {
                    let oracle = accounts.get(account_index).copied();
                    self.record_failure(&mut report, account_index, oracle, &e);
                }
                return report;
            }
        };
        tracing::info!(%fee, count = self.plan.oracle_count, "registering oracles");

        for account_index in self.account_indexes() {
            let Some(oracle) = accounts.get(account_index).copied() else {
                let e = SimulatorError::MissingAccount {
                    index: account_index,
                    available: accounts.len(),
                };
                self.record_failure(&mut report, account_index, None, &e);
                continue;
            };

            match self.register_one(oracle, fee).await {
                Ok(identity) => {
                    tracing::info!(
                        %oracle,
                        indexes = ?identity.indexes(),
                        "oracle registered"
                    );
                    let _ = self.event_bus.publish(SimulatorEvent::OracleRegistered {
                        oracle,
                        indexes: identity.indexes().to_vec(),
                        timestamp: Utc::now(),
                    });
                    report.registered.push(oracle);
                }
                Err(e) => self.record_failure(&mut report, account_index, Some(oracle), &e),
            }
        }

        tracing::info!(
            requested = report.requested,
            registered = report.registered.len(),
            failed = report.failed.len(),
            "oracle registration finished"
        );
        report
    }

    /// Authorizes, then registers every planned oracle.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::AuthorizationFailed`] if authorization
    /// fails; no registration is attempted in that case.
    pub async fn run(&self) -> Result<RegistrationReport, SimulatorError> {
        let accounts = self.authorize().await?;
        Ok(self.register_all(&accounts).await)
    }

    async fn register_one(
        &self,
        oracle: Address,
        fee: Wei,
    ) -> Result<Arc<OracleIdentity>, SimulatorError> {
        self.contract.register_oracle(oracle, fee).await?;
        let indexes = self.contract.get_my_indexes(oracle).await?;
        let identity = OracleIdentity::new(oracle, indexes)?;
        self.pool.add(identity).await
    }

    fn account_indexes(&self) -> std::ops::Range<usize> {
        let start = self.plan.account_offset;
        start..start.saturating_add(self.plan.oracle_count)
    }

    fn record_failure(
        &self,
        report: &mut RegistrationReport,
        account_index: usize,
        oracle: Option<Address>,
        error: &SimulatorError,
    ) {
        tracing::warn!(account_index, oracle = ?oracle, error = %error, "oracle registration skipped");
        let _ = self.event_bus.publish(SimulatorEvent::RegistrationFailed {
            account_index,
            oracle,
            reason: error.to_string(),
            timestamp: Utc::now(),
        });
        report.failed.push(RegistrationFailure {
            account_index,
            oracle,
            reason: error.to_string(),
        });
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::chain::mock::{MockContract, mock_address};
    use crate::domain::OracleRequest;
    use crate::service::ResponseDispatcher;

    const APP: Address = Address::new([0xee; 20]);

    fn plan(oracle_count: usize, account_offset: usize) -> RegistrationPlan {
        RegistrationPlan {
            owner_index: 0,
            oracle_count,
            account_offset,
            app_address: APP,
        }
    }

    fn coordinator(
        mock: &Arc<MockContract>,
        plan: RegistrationPlan,
    ) -> (RegistrationCoordinator, Arc<IdentityPool>, EventBus) {
        let pool = Arc::new(IdentityPool::new());
        let bus = EventBus::new(100);
        let contract: Arc<dyn OracleContract> = Arc::clone(mock) as Arc<dyn OracleContract>;
        let coordinator =
            RegistrationCoordinator::new(contract, Arc::clone(&pool), bus.clone(), plan);
        (coordinator, pool, bus)
    }

    #[tokio::test]
    async fn registers_offset_accounts_with_fee() {
        let mock = Arc::new(MockContract::with_accounts(6));
        let (coordinator, pool, _) = coordinator(&mock, plan(3, 2));

        let Ok(report) = coordinator.run().await else {
            panic!("registration should succeed");
        };

        assert_eq!(report.requested, 3);
        assert_eq!(
            report.registered,
            vec![mock_address(2), mock_address(3), mock_address(4)]
        );
        assert!(report.failed.is_empty());
        assert_eq!(pool.len().await, 3);

        let state = mock.state();
        assert_eq!(state.authorizations, vec![(mock_address(0), APP)]);
        assert!(state.registrations.iter().all(|(_, fee)| *fee == state.fee));
        assert_eq!(state.index_queries.len(), 3);
    }

    #[tokio::test]
    async fn pool_holds_indexes_assigned_by_registry() {
        let mock = Arc::new(MockContract::with_accounts(4));
        let (coordinator, pool, _) = coordinator(&mock, plan(2, 1));
        let _ = coordinator.run().await;

        let expected = mock.state().indexes.clone();
        for member in pool.list().await {
            assert!(!member.indexes().is_empty());
            assert_eq!(Some(&member.indexes().to_vec()), expected.get(&member.address()));
        }
    }

    #[tokio::test]
    async fn one_failed_registration_is_skipped() {
        let mock = Arc::new(MockContract::with_accounts(5));
        mock.state().failing_registrations.insert(mock_address(2));
        let (coordinator, pool, bus) = coordinator(&mock, plan(3, 1));
        let mut rx = bus.subscribe();

        let Ok(report) = coordinator.run().await else {
            panic!("registration should not be fatal");
        };

        assert_eq!(report.registered, vec![mock_address(1), mock_address(3)]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed.first().and_then(|f| f.oracle), Some(mock_address(2)));
        assert_eq!(pool.len().await, 2);
        // the failed oracle is never asked for its indexes
        assert!(!mock.state().index_queries.contains(&mock_address(2)));

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            kinds.push(event.event_type_str());
        }
        assert_eq!(
            kinds,
            vec!["oracle_registered", "registration_failed", "oracle_registered"]
        );
    }

    #[tokio::test]
    async fn missing_accounts_are_reported_not_fatal() {
        let mock = Arc::new(MockContract::with_accounts(3));
        let (coordinator, pool, _) = coordinator(&mock, plan(4, 1));

        let Ok(report) = coordinator.run().await else {
            panic!("registration should not be fatal");
        };

        assert_eq!(report.registered.len(), 2);
        assert_eq!(report.failed.len(), 2);
        assert!(report.failed.iter().all(|f| f.oracle.is_none()));
        assert_eq!(pool.len().await, 2);
    }

    #[tokio::test]
    async fn rejected_authorization_stops_before_registration() {
        let mock = Arc::new(MockContract::with_accounts(5));
        mock.state().fail_authorization = true;
        let (coordinator, pool, _) = coordinator(&mock, plan(3, 1));

        let result = coordinator.run().await;

        assert!(matches!(result, Err(SimulatorError::AuthorizationFailed(_))));
        assert!(mock.state().registrations.is_empty());
        assert!(pool.is_empty().await);
    }

    #[tokio::test]
    async fn missing_owner_is_fatal() {
        let mock = Arc::new(MockContract::with_accounts(0));
        let (coordinator, _, _) = coordinator(&mock, plan(1, 1));

        let result = coordinator.authorize().await;
        assert!(matches!(result, Err(SimulatorError::AuthorizationFailed(_))));
        assert!(mock.state().authorizations.is_empty());
    }

    #[tokio::test]
    async fn unreadable_fee_fails_every_candidate() {
        let mock = Arc::new(MockContract::with_accounts(4));
        mock.state().fail_fee = true;
        let (coordinator, pool, _) = coordinator(&mock, plan(3, 1));

        let Ok(report) = coordinator.run().await else {
            panic!("fee failure should not be fatal");
        };

        assert!(report.registered.is_empty());
        assert_eq!(report.failed.len(), 3);
        assert!(mock.state().registrations.is_empty());
        assert!(pool.is_empty().await);
    }

    #[tokio::test]
    async fn empty_index_assignment_is_skipped() {
        let mock = Arc::new(MockContract::with_accounts(3));
        mock.state().indexes.insert(mock_address(1), Vec::new());
        let (coordinator, pool, _) = coordinator(&mock, plan(2, 1));

        let Ok(report) = coordinator.run().await else {
            panic!("registration should not be fatal");
        };
        assert_eq!(report.registered, vec![mock_address(2)]);
        assert_eq!(pool.len().await, 1);
    }

    #[tokio::test]
    async fn rerunning_does_not_duplicate_members() {
        let mock = Arc::new(MockContract::with_accounts(3));
        let (coordinator, pool, _) = coordinator(&mock, plan(2, 1));
        let Ok(accounts) = coordinator.authorize().await else {
            panic!("authorization should succeed");
        };

        let first = coordinator.register_all(&accounts).await;
        let second = coordinator.register_all(&accounts).await;

        assert_eq!(first.registered.len(), 2);
        assert!(second.registered.is_empty());
        assert_eq!(second.failed.len(), 2);
        assert_eq!(pool.len().await, 2);
        assert_eq!(coordinator.plan().oracle_count, 2);
    }

    #[tokio::test]
    async fn failed_registration_leaves_remaining_oracles_dispatchable() {
        let mock = Arc::new(MockContract::with_accounts(4));
        mock.state().failing_registrations.insert(mock_address(2));
        let (coordinator, pool, bus) = coordinator(&mock, plan(3, 1));

        let Ok(report) = coordinator.run().await else {
            panic!("registration should succeed");
        };
        assert_eq!(report.registered, vec![mock_address(1), mock_address(3)]);

        let contract: Arc<dyn OracleContract> = Arc::clone(&mock) as Arc<dyn OracleContract>;
        let dispatcher = ResponseDispatcher::with_seed(contract, Arc::clone(&pool), bus, 7);
        let request = OracleRequest {
            index: 3,
            airline: mock_address(200),
            flight: "ND1309".to_string(),
            timestamp: 1_700_000_000,
            block_number: Some(1),
        };
        let outcome = dispatcher.dispatch(&request).await;

        assert_eq!(outcome.matched, 2);
        assert_eq!(outcome.accepted, 2);
        let senders: HashSet<Address> = mock
            .state()
            .submissions
            .iter()
            .map(|(oracle, _)| *oracle)
            .collect();
        assert_eq!(senders, HashSet::from([mock_address(1), mock_address(3)]));
        assert!(!senders.contains(&mock_address(2)));
    }
}
