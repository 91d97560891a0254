use crate::domain::entities::LockHandle;
use crate::domain::errors::{SeckillError, SeckillResult};
use crate::domain::services::{LeaseRenewer, LockManager, RenewalOutcome, RenewalTask};
use std::future::Future;
use std::time::Duration;

/// Runs an operation while holding the lease on a resource key.
///
/// Sequence: acquire, start renewer, run, stop renewer, release. The last two steps run
/// on every exit path of the operation, including cancellation of the returned future.
/// A release failure is logged and never replaces the operation's own result.
#[derive(Clone)]
pub struct InventoryGuard {
    lock_manager: LockManager,
    renewer: LeaseRenewer,
}

impl InventoryGuard {
    pub fn new(lock_manager: LockManager, renewer: LeaseRenewer) -> Self {
        Self {
            lock_manager,
            renewer,
        }
    }

    pub async fn run_guarded<T, F, Fut>(
        &self,
        resource_key: &str,
        ttl: Duration,
        operation: F,
    ) -> SeckillResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SeckillResult<T>>,
    {
        let handle = self.lock_manager.acquire(resource_key, ttl).await?;
        let renewal = self.renewer.start(&handle);
        let lease = HeldLease {
            lock_manager: self.lock_manager.clone(),
            handle: Some(handle),
            renewal: Some(renewal),
        };

        let result = operation().await;

        let outcome = lease.finish().await;

        match (result, outcome) {
            (Ok(_), RenewalOutcome::OwnershipLost) => {
                tracing::error!(
                    "Lease on {} was lost while the guarded operation ran",
                    resource_key
                );
                Err(SeckillError::LostOwnership(resource_key.to_string()))
            }
            (result, _) => result,
        }
    }
}

/// Lease held for the duration of one guarded operation.
///
/// If the owning future is dropped before `finish` completes, `Drop` hands the
/// renewer stop and the owner-checked release to a spawned task.
struct HeldLease {
    lock_manager: LockManager,
    handle: Option<LockHandle>,
    renewal: Option<RenewalTask>,
}

impl HeldLease {
    async fn finish(mut self) -> RenewalOutcome {
        let outcome = match self.renewal.take() {
            Some(renewal) => renewal.stop().await,
            None => RenewalOutcome::Completed,
        };
        if let Some(handle) = &self.handle {
            if let Err(e) = self.lock_manager.release(handle).await {
                tracing::warn!("Failed to release lock {}: {}", handle.resource_key, e);
            }
        }
        self.handle = None;
        outcome
    }
}

impl Drop for HeldLease {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let renewal = self.renewal.take();
        let lock_manager = self.lock_manager.clone();

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                tracing::debug!("Guarded operation on {} was cancelled", handle.resource_key);
                runtime.spawn(async move {
                    if let Some(renewal) = renewal {
                        renewal.stop().await;
                    }
                    if let Err(e) = lock_manager.release(&handle).await {
                        tracing::warn!("Failed to release lock {}: {}", handle.resource_key, e);
                    }
                });
            }
            Err(_) => {
                tracing::warn!(
                    "No runtime to release lock {}; it expires with its lease",
                    handle.resource_key
                );
            }
        }
    }
}
