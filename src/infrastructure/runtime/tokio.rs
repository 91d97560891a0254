use crate::domain::ports::time_service::TimeService;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::Instant;

/// Wall clock anchored once and advanced by tokio's monotonic clock.
///
/// Under `tokio::time::pause` both `sleep` and `now` follow virtual time, which keeps
/// lease expiry deterministic in tests.
#[derive(Clone)]
pub struct TokioTimeService {
    anchor_wall: DateTime<Utc>,
    anchor: Instant,
}

impl TokioTimeService {
    pub fn new() -> Self {
        Self {
            anchor_wall: Utc::now(),
            anchor: Instant::now(),
        }
    }
}

impl Default for TokioTimeService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TimeService for TokioTimeService {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.anchor.elapsed())
            .unwrap_or_else(|_| chrono::Duration::zero());
        self.anchor_wall + elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_now_follows_paused_clock() {
        let time_service = TokioTimeService::new();
        let before = time_service.now();

        time_service.sleep(Duration::from_millis(1500)).await;

        let after = time_service.now();
        assert_eq!((after - before).num_milliseconds(), 1500);
    }
}
