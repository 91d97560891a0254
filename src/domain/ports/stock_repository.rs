use crate::domain::errors::SeckillResult;
use async_trait::async_trait;

#[async_trait]
pub trait StockRepository: Send + Sync {
    /// Current stock, or None when the sale row does not exist.
    async fn read_count(&self, seckill_id: i64, time: i32) -> SeckillResult<Option<i64>>;
}
