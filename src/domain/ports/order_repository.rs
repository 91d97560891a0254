use crate::domain::entities::OrderInfo;
use crate::domain::errors::SeckillResult;
use async_trait::async_trait;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn exists(&self, user_id: &str, seckill_id: i64, time: i32) -> SeckillResult<bool>;

    /// Fails with `DuplicateOrder` if the (user, seckill id, time) triple is taken.
    async fn create(&self, order: &OrderInfo) -> SeckillResult<()>;

    /// Take one unit of the order's sale stock and record `order`, as one atomic unit.
    ///
    /// Returns `Ok(false)` when the stock is already at zero. On `Ok(false)` or any error
    /// neither write is visible, and the same holds if the future is dropped midway.
    async fn decrement_and_create_order(&self, order: &OrderInfo) -> SeckillResult<bool>;

    async fn find_by_order_no(&self, order_no: &str) -> SeckillResult<Option<OrderInfo>>;
}
