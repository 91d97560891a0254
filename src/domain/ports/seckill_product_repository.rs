use crate::domain::entities::SeckillProduct;
use crate::domain::errors::SeckillResult;
use async_trait::async_trait;

#[async_trait]
pub trait SeckillProductRepository: Send + Sync {
    /// Sale rows of the `time` session starting on `start_date` (YYYY-MM-DD).
    async fn list_by_time(&self, start_date: &str, time: i32) -> SeckillResult<Vec<SeckillProduct>>;

    async fn find_by_id_and_time(&self, id: i64, time: i32)
        -> SeckillResult<Option<SeckillProduct>>;
}
