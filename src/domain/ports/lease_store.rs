use crate::domain::errors::SeckillResult;
use async_trait::async_trait;
use std::time::Duration;

/// Atomic primitives over the shared lease record of a key.
///
/// Every method must be a single atomic step at the store. An expired record behaves
/// exactly like an absent one.
#[async_trait]
pub trait LeaseStore: Send + Sync {
    /// Store `owner` under `key` for `ttl` unless an unexpired record exists.
    /// Returns true if the record was written.
    async fn set_if_absent(&self, key: &str, owner: &str, ttl: Duration) -> SeckillResult<bool>;

    /// Push the expiry of `key` to now + `ttl` if it is still held by `owner`.
    async fn refresh_if_owner(&self, key: &str, owner: &str, ttl: Duration)
        -> SeckillResult<bool>;

    /// Delete `key` if it is still held by `owner`.
    async fn delete_if_owner(&self, key: &str, owner: &str) -> SeckillResult<bool>;
}
