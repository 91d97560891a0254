use crate::domain::entities::{LockHandle, LockPolicy};
use crate::domain::errors::{SeckillError, SeckillResult};
use crate::domain::ports::lease_store::LeaseStore;
use crate::domain::ports::time_service::TimeService;
use std::sync::Arc;
use std::time::Duration;

/// Bounded-retry acquisition and owner-checked release over a `LeaseStore`.
///
/// The lock is unfair: whoever wins the next conditional set gets it. Under heavy
/// contention callers get `LockBusy` after `max_attempts` instead of queueing up.
#[derive(Clone)]
pub struct LockManager {
    store: Arc<dyn LeaseStore>,
    time_service: Arc<dyn TimeService>,
    policy: LockPolicy,
}

impl LockManager {
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

    pub async fn acquire(&self, resource_key: &str, ttl: Duration) -> SeckillResult<LockHandle> {
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            // Fresh owner per attempt
            let owner_id = uuid::Uuid::new_v4().to_string();

            if self.store.set_if_absent(resource_key, &owner_id, ttl).await? {
                tracing::debug!(
                    "Lock acquired: key={}, owner={}, attempt={}",
                    resource_key,
                    owner_id,
                    attempt
                );
                metrics::counter!("seckill_lock_acquired_total").increment(1);
                return Ok(LockHandle::new(
                    resource_key.to_string(),
                    owner_id,
                    ttl,
                    self.time_service.now(),
                ));
            }

            if attempt < max_attempts {
                self.time_service.sleep(self.policy.retry_delay).await;
            }
        }

        tracing::warn!(
            "Lock busy after {} attempts: key={}",
            max_attempts,
            resource_key
        );
        metrics::counter!("seckill_lock_busy_total").increment(1);
        Err(SeckillError::LockBusy(resource_key.to_string()))
    }

    /// Idempotent. A handle whose lease expired and was taken over is left alone.
    pub async fn release(&self, handle: &LockHandle) -> SeckillResult<()> {
        let deleted = self
            .store
            .delete_if_owner(&handle.resource_key, &handle.owner_id)
            .await?;

        if deleted {
            tracing::debug!(
                "Lock released: key={}, owner={}",
                handle.resource_key,
                handle.owner_id
            );
        } else {
            tracing::debug!(
                "Lock already released or reassigned: key={}, owner={}",
                handle.resource_key,
                handle.owner_id
            );
        }
        Ok(())
    }
}
