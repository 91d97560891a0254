use crate::application::services::{InventoryGuard, SeckillProductService};
use crate::domain::entities::{stock_lock_key, OrderInfo, SeckillProductVo, UserInfo};
use crate::domain::errors::{SeckillError, SeckillResult};
use crate::domain::ports::{
    order_repository::OrderRepository, stock_repository::StockRepository,
    time_service::TimeService,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::sync::Arc;
use std::time::Duration;

/// Places seckill orders.
///
/// Cheap rejections (unknown sale, closed window, repeat buyer, sold out) run before the
/// lock. Inside the lock the order-exists and stock checks are repeated against the
/// store, so the read-check-decrement-create sequence is serialized per (seckill id, time).
#[derive(Clone)]
pub struct SeckillService {
    product_service: SeckillProductService,
    stock_repo: Arc<dyn StockRepository>,
    order_repo: Arc<dyn OrderRepository>,
    guard: InventoryGuard,
    time_service: Arc<dyn TimeService>,
    lock_ttl: Duration,
    sale_window_hours: i64,
}

impl SeckillService {
    pub fn new(
        product_service: SeckillProductService,
        stock_repo: Arc<dyn StockRepository>,
        order_repo: Arc<dyn OrderRepository>,
        guard: InventoryGuard,
        time_service: Arc<dyn TimeService>,
        lock_ttl: Duration,
        sale_window_hours: i64,
    ) -> Self {
        Self {
            product_service,
            stock_repo,
            order_repo,
            guard,
            time_service,
            lock_ttl,
            sale_window_hours,
        }
    }

    /// Buy one unit of `seckill_id` in the `time` session. Returns the new order number.
    pub async fn do_seckill(
        &self,
        user: &UserInfo,
        seckill_id: i64,
        time: i32,
    ) -> SeckillResult<String> {
        match self.place_order(user, seckill_id, time).await {
            Ok(order_no) => {
                metrics::counter!("seckill_orders_created_total").increment(1);
                tracing::info!(
                    "Seckill succeeded: user={}, seckill_id={}, time={}, order_no={}",
                    user.phone,
                    seckill_id,
                    time,
                    order_no
                );
                Ok(order_no)
            }
            Err(e) => {
                metrics::counter!("seckill_order_rejected_total", "reason" => e.kind())
                    .increment(1);
                if e.is_business_error() || e.is_lock_error() {
                    tracing::info!(
                        "Seckill rejected: user={}, seckill_id={}, time={}: {}",
                        user.phone,
                        seckill_id,
                        time,
                        e
                    );
                } else {
                    tracing::error!(
                        "Seckill failed: user={}, seckill_id={}, time={}: {}",
                        user.phone,
                        seckill_id,
                        time,
                        e
                    );
                }
                Err(e)
            }
        }
    }

    async fn place_order(
        &self,
        user: &UserInfo,
        seckill_id: i64,
        time: i32,
    ) -> SeckillResult<String> {
        let vo = self
            .product_service
            .find_by_id_and_time(seckill_id, time)
            .await?
            .ok_or_else(|| SeckillError::NotFound(format!("seckill {} at {}", seckill_id, time)))?;

        if !self.within_sale_window(&vo) {
            return Err(SeckillError::OutOfSaleWindow);
        }

        if self.order_repo.exists(&user.phone, seckill_id, time).await? {
            return Err(SeckillError::DuplicateOrder);
        }

        if vo.stock_count <= 0 {
            return Err(SeckillError::StockExhausted);
        }

        let key = stock_lock_key(seckill_id, time);
        self.guard
            .run_guarded(&key, self.lock_ttl, || self.purchase(user, &vo))
            .await
    }

    /// Critical section. Caller holds the stock lock for `vo`.
    async fn purchase(&self, user: &UserInfo, vo: &SeckillProductVo) -> SeckillResult<String> {
        if self.order_repo.exists(&user.phone, vo.id, vo.time).await? {
            return Err(SeckillError::DuplicateOrder);
        }

        let count = self
            .stock_repo
            .read_count(vo.id, vo.time)
            .await?
            .ok_or_else(|| SeckillError::NotFound(format!("stock {} at {}", vo.id, vo.time)))?;
        if count <= 0 {
            return Err(SeckillError::StockExhausted);
        }

        let order = OrderInfo::new(user, vo, self.time_service.now().to_rfc3339());
        if !self.order_repo.decrement_and_create_order(&order).await? {
            return Err(SeckillError::StockExhausted);
        }

        Ok(order.order_no)
    }

    /// True when local now lies in `[start_date time:00, + sale_window_hours]`.
    fn within_sale_window(&self, vo: &SeckillProductVo) -> bool {
        let start = match NaiveDate::parse_from_str(&vo.start_date, "%Y-%m-%d") {
            Ok(date) => date.and_hms_opt(vo.time as u32, 0, 0),
            Err(e) => {
                tracing::warn!(
                    "Invalid start date {:?} on seckill {}: {}",
                    vo.start_date,
                    vo.id,
                    e
                );
                None
            }
        };
        let Some(start) = start else {
            return false;
        };

        let end = start + chrono::Duration::hours(self.sale_window_hours);
        let now: NaiveDateTime = self.time_service.now().with_timezone(&Local).naive_local();
        start <= now && now <= end
    }
}
