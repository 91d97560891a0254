use crate::domain::entities::{LockHandle, LockPolicy};
use crate::domain::ports::lease_store::LeaseStore;
use crate::domain::ports::time_service::TimeService;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// How a renewal task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalOutcome {
    Completed,
    OwnershipLost,
}

/// Watchdog that keeps a held lease ahead of its expiry while the critical section
/// runs. One task per held lock.
#[derive(Clone)]
pub struct LeaseRenewer {
    store: Arc<dyn LeaseStore>,
    time_service: Arc<dyn TimeService>,
    policy: LockPolicy,
}

impl LeaseRenewer {
    pub fn new(
        store: Arc<dyn LeaseStore>,
        time_service: Arc<dyn TimeService>,
        policy: LockPolicy,
    ) -> Self {
        Self {
            store,
            time_service,
            policy,
        }
    }

    pub fn start(&self, handle: &LockHandle) -> RenewalTask {
        let interval = self.policy.renew_interval(handle.lease_ttl);
        let extend_to = self.policy.renewal_ttl(handle.lease_ttl);

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let (lost_tx, lost_rx) = watch::channel(false);

        let store = self.store.clone();
        let time_service = self.time_service.clone();
        let key = handle.resource_key.clone();
        let owner = handle.owner_id.clone();

        let join = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = time_service.sleep(interval) => {
                        // The refresh itself is never raced against cancellation, so
                        // stop() only returns once an in-flight tick has finished.
                        match store.refresh_if_owner(&key, &owner, extend_to).await {
                            Ok(true) => {
                                tracing::trace!("Lease renewed: key={}, owner={}", key, owner);
                            }
                            Ok(false) => {
                                tracing::warn!(
                                    "Lease ownership lost, stopping renewer: key={}, owner={}",
                                    key,
                                    owner
                                );
                                metrics::counter!("seckill_lock_ownership_lost_total")
                                    .increment(1);
                                let _ = lost_tx.send(true);
                                break;
                            }
                            Err(e) => {
                                // Keep ticking; a lapsed lease shows up as a loss next tick.
                                tracing::warn!("Lease renewal failed for key {}: {}", key, e);
                            }
                        }
                    }
                }
            }
        });

        RenewalTask {
            token,
            join: Some(join),
            lost: lost_rx,
        }
    }
}

/// Running renewal for one handle. Dropping it cancels the task without waiting.
pub struct RenewalTask {
    token: CancellationToken,
    join: Option<JoinHandle<()>>,
    lost: watch::Receiver<bool>,
}

impl RenewalTask {
    pub fn ownership_lost(&self) -> bool {
        *self.lost.borrow()
    }

    /// Receiver flipped to `true` when the renewer notices the lease is gone.
    pub fn lost_signal(&self) -> watch::Receiver<bool> {
        self.lost.clone()
    }

    /// Cancel and wait for the task, including any refresh still in flight.
    pub async fn stop(mut self) -> RenewalOutcome {
        self.token.cancel();
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                tracing::error!("Lease renewer task failed: {}", e);
            }
        }

        if self.ownership_lost() {
            RenewalOutcome::OwnershipLost
        } else {
            RenewalOutcome::Completed
        }
    }
}

impl Drop for RenewalTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::LockManager;
    use crate::infrastructure::persistence::memory::MemoryLeaseStore;
    use crate::infrastructure::runtime::tokio::TokioTimeService;
    use std::time::Duration;

    fn policy() -> LockPolicy {
        LockPolicy {
            renew_margin: Duration::from_millis(50),
            ..LockPolicy::default()
        }
    }

    fn setup() -> (MemoryLeaseStore, LockManager, LeaseRenewer, Arc<TokioTimeService>) {
        let time_service = Arc::new(TokioTimeService::new());
        let store = MemoryLeaseStore::new(time_service.clone());
        let manager = LockManager::new(Arc::new(store.clone()), time_service.clone(), policy());
        let renewer = LeaseRenewer::new(Arc::new(store.clone()), time_service.clone(), policy());
        (store, manager, renewer, time_service)
    }

    #[tokio::test(start_paused = true)]
    async fn test_renewer_keeps_lease_alive_past_ttl() {
        let (store, manager, renewer, time_service) = setup();
        let handle = manager
            .acquire("k", Duration::from_millis(100))
            .await
            .unwrap();
        let renewal = renewer.start(&handle);

        time_service.sleep(Duration::from_millis(300)).await;

        assert_eq!(store.owner_of("k").await, Some(handle.owner_id.clone()));
        assert!(!store
            .set_if_absent("k", "intruder", Duration::from_secs(1))
            .await
            .unwrap());
        assert_eq!(renewal.stop().await, RenewalOutcome::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lease_expires_without_renewer() {
        let (store, manager, _renewer, time_service) = setup();
        manager
            .acquire("k", Duration::from_millis(100))
            .await
            .unwrap();

        time_service.sleep(Duration::from_millis(150)).await;

        assert_eq!(store.owner_of("k").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_renewer_detects_lost_ownership() {
        let (store, manager, renewer, time_service) = setup();
        let handle = manager
            .acquire("k", Duration::from_millis(100))
            .await
            .unwrap();
        let renewal = renewer.start(&handle);
        let mut lost = renewal.lost_signal();

        // Lease lapses and someone else takes it over
        store.delete_if_owner("k", &handle.owner_id).await.unwrap();
        store
            .set_if_absent("k", "intruder", Duration::from_secs(10))
            .await
            .unwrap();

        lost.changed().await.unwrap();
        assert!(*lost.borrow());
        assert!(renewal.ownership_lost());
        assert_eq!(renewal.stop().await, RenewalOutcome::OwnershipLost);

        // The renewer must not have extended the intruder's lease to its own ttl
        time_service.sleep(Duration::from_millis(500)).await;
        assert_eq!(store.owner_of("k").await, Some("intruder".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_renewal() {
        let (store, manager, renewer, time_service) = setup();
        let handle = manager
            .acquire("k", Duration::from_millis(100))
            .await
            .unwrap();
        let renewal = renewer.start(&handle);

        assert_eq!(renewal.stop().await, RenewalOutcome::Completed);

        time_service.sleep(Duration::from_millis(150)).await;
        assert_eq!(store.owner_of("k").await, None);
    }
}
