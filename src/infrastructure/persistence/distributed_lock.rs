use crate::domain::errors::SeckillResult;
use crate::domain::ports::lease_store::LeaseStore;
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;

/// Lease records in the `distributed_locks` table, one statement per primitive.
///
/// Expiry is kept as epoch milliseconds so that comparisons stay numeric.
#[derive(Clone)]
pub struct SqlLeaseStore {
    db: Database,
}

impl SqlLeaseStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Current unexpired owner of `key`.
    pub async fn owner_of(&self, key: &str) -> SeckillResult<Option<String>> {
        let owner: Option<(String,)> = sqlx::query_as(
            "SELECT owner FROM distributed_locks WHERE lock_key = ? AND expires_at > ?",
        )
        .bind(key)
        .bind(Utc::now().timestamp_millis())
        .fetch_optional(&self.db.pool)
        .await?;
        Ok(owner.map(|(owner,)| owner))
    }
}

fn ttl_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}

#[async_trait]
impl LeaseStore for SqlLeaseStore {
    async fn set_if_absent(&self, key: &str, owner: &str, ttl: Duration) -> SeckillResult<bool> {
        let now = Utc::now().timestamp_millis();
        let expires_at = now.saturating_add(ttl_millis(ttl));

        // Insert, or take over a record whose lease has run out.
        let query = r#"
            INSERT INTO distributed_locks (lock_key, owner, expires_at, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(lock_key) DO UPDATE SET
                owner = excluded.owner,
                expires_at = excluded.expires_at,
                created_at = excluded.created_at
            WHERE distributed_locks.expires_at <= ?
        "#;

        let result = sqlx::query(query)
            .bind(key)
            .bind(owner)
            .bind(expires_at)
            .bind(now)
            .bind(now)
            .execute(&self.db.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn refresh_if_owner(
        &self,
        key: &str,
        owner: &str,
        ttl: Duration,
    ) -> SeckillResult<bool> {
        let now = Utc::now().timestamp_millis();

        let result = sqlx::query(
            "UPDATE distributed_locks SET expires_at = ?
             WHERE lock_key = ? AND owner = ? AND expires_at > ?",
        )
        .bind(now.saturating_add(ttl_millis(ttl)))
        .bind(key)
        .bind(owner)
        .bind(now)
        .execute(&self.db.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_if_owner(&self, key: &str, owner: &str) -> SeckillResult<bool> {
        let result = sqlx::query("DELETE FROM distributed_locks WHERE lock_key = ? AND owner = ?")
            .bind(key)
            .bind(owner)
            .execute(&self.db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
