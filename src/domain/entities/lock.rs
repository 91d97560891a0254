use chrono::{DateTime, Utc};
use std::time::Duration;

/// Proof of a successful acquisition.
///
/// The owner id is generated per attempt, so a late release from an older, expired
/// attempt can never match a newer holder's record. Deliberately not `Clone`.
#[derive(Debug)]
pub struct LockHandle {
    pub resource_key: String,
    pub owner_id: String,
    pub lease_ttl: Duration,
    pub acquired_at: DateTime<Utc>,
}

impl LockHandle {
    pub fn new(
        resource_key: String,
        owner_id: String,
        lease_ttl: Duration,
        acquired_at: DateTime<Utc>,
    ) -> Self {
        Self {
            resource_key,
            owner_id,
            lease_ttl,
            acquired_at,
        }
    }
}

/// Retry and renewal policy shared by the lock manager and the renewer.
#[derive(Debug, Clone, PartialEq)]
pub struct LockPolicy {
    /// Total number of conditional-set attempts before giving up with `LockBusy`.
    pub max_attempts: u32,
    /// Pause between two attempts.
    pub retry_delay: Duration,
    /// Renewal tick as a fraction of the lease TTL, in (0, 1).
    pub renew_ratio: f64,
    /// Extra time granted on top of one tick interval at every renewal.
    pub renew_margin: Duration,
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay: Duration::from_millis(10),
            renew_ratio: 0.8,
            renew_margin: Duration::from_secs(2),
        }
    }
}

impl LockPolicy {
    pub fn renew_interval(&self, ttl: Duration) -> Duration {
        // Sub-millisecond ticks would spin the store.
        ttl.mul_f64(self.renew_ratio).max(Duration::from_millis(1))
    }

    /// Lease length written by every successful renewal.
    pub fn renewal_ttl(&self, ttl: Duration) -> Duration {
        self.renew_interval(ttl) + self.renew_margin
    }
}
