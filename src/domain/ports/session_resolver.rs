use crate::domain::entities::UserInfo;
use crate::domain::errors::SeckillResult;
use async_trait::async_trait;

#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Resolve a login token to its user. Unknown or expired tokens yield None.
    async fn resolve(&self, token: &str) -> SeckillResult<Option<UserInfo>>;
}
