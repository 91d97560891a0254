use crate::domain::entities::UserInfo;
use crate::domain::errors::SeckillResult;
use crate::domain::ports::session_resolver::SessionResolver;
use crate::infrastructure::persistence::Database;
use chrono::Utc;
use sqlx::Row;
use std::time::Duration;

impl Database {
    /// Register a login token for `user`, valid for `ttl`.
    pub async fn create_user_token(
        &self,
        token: &str,
        user: &UserInfo,
        ttl: Duration,
    ) -> SeckillResult<()> {
        let expires_at = Utc::now().timestamp_millis() + ttl.as_millis() as i64;

        sqlx::query(
            "INSERT INTO user_tokens (token, phone, nick_name, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(token)
        .bind(&user.phone)
        .bind(&user.nick_name)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl SessionResolver for Database {
    async fn resolve(&self, token: &str) -> SeckillResult<Option<UserInfo>> {
        let row = sqlx::query(
            "SELECT phone, nick_name FROM user_tokens WHERE token = ? AND expires_at > ?",
        )
        .bind(token)
        .bind(Utc::now().timestamp_millis())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            Ok(Some(UserInfo {
                phone: row.try_get("phone")?,
                nick_name: row.try_get("nick_name").ok(),
            }))
        } else {
            Ok(None)
        }
    }
}
