//! In-process stores for tests and single-node runs.
//!
//! Each store keeps its state behind one mutex, so every trait method is atomic the
//! same way a single SQL statement is.

use crate::domain::entities::{OrderInfo, SeckillProduct};
use crate::domain::errors::{SeckillError, SeckillResult};
use crate::domain::ports::{
    lease_store::LeaseStore, order_repository::OrderRepository,
    seckill_product_repository::SeckillProductRepository, stock_repository::StockRepository,
    time_service::TimeService,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct LeaseRecord {
    owner: String,
    expires_at_ms: i64,
}

#[derive(Clone)]
pub struct MemoryLeaseStore {
    records: Arc<Mutex<HashMap<String, LeaseRecord>>>,
    time_service: Arc<dyn TimeService>,
}

impl MemoryLeaseStore {
    pub fn new(time_service: Arc<dyn TimeService>) -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            time_service,
        }
    }

    /// Current unexpired owner of `key`.
    pub async fn owner_of(&self, key: &str) -> Option<String> {
        let now = self.now_ms();
        let records = self.records.lock().await;
        records
            .get(key)
            .filter(|r| r.expires_at_ms > now)
            .map(|r| r.owner.clone())
    }

    fn now_ms(&self) -> i64 {
        self.time_service.now().timestamp_millis()
    }
}

#[async_trait]
impl LeaseStore for MemoryLeaseStore {
    async fn set_if_absent(&self, key: &str, owner: &str, ttl: Duration) -> SeckillResult<bool> {
        let now = self.now_ms();
        let mut records = self.records.lock().await;

        if records.get(key).is_some_and(|r| r.expires_at_ms > now) {
            return Ok(false);
        }

        records.insert(
            key.to_string(),
            LeaseRecord {
                owner: owner.to_string(),
                expires_at_ms: now + ttl.as_millis() as i64,
            },
        );
        Ok(true)
    }

    async fn refresh_if_owner(
        &self,
        key: &str,
        owner: &str,
        ttl: Duration,
    ) -> SeckillResult<bool> {
        let now = self.now_ms();
        let mut records = self.records.lock().await;

        match records.get_mut(key) {
            Some(record) if record.owner == owner && record.expires_at_ms > now => {
                record.expires_at_ms = now + ttl.as_millis() as i64;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_if_owner(&self, key: &str, owner: &str) -> SeckillResult<bool> {
        let mut records = self.records.lock().await;

        if records.get(key).is_some_and(|r| r.owner == owner) {
            records.remove(key);
            return Ok(true);
        }
        Ok(false)
    }
}

/// Sale rows and orders kept together, mirroring the SQL schema.
#[derive(Clone, Default)]
pub struct MemorySeckillStore {
    products: Arc<Mutex<HashMap<(i64, i32), SeckillProduct>>>,
    orders: Arc<Mutex<Vec<OrderInfo>>>,
}

impl MemorySeckillStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_product(&self, product: SeckillProduct) {
        self.products
            .lock()
            .await
            .insert((product.id, product.time), product);
    }

    pub async fn orders(&self) -> Vec<OrderInfo> {
        self.orders.lock().await.clone()
    }
}

#[async_trait]
impl StockRepository for MemorySeckillStore {
    async fn read_count(&self, seckill_id: i64, time: i32) -> SeckillResult<Option<i64>> {
        let products = self.products.lock().await;
        Ok(products.get(&(seckill_id, time)).map(|p| p.stock_count))
    }
}

fn insert_unique(orders: &mut Vec<OrderInfo>, order: &OrderInfo) -> SeckillResult<()> {
    if orders.iter().any(|o| {
        o.user_id == order.user_id
            && o.seckill_id == order.seckill_id
            && o.seckill_time == order.seckill_time
    }) {
        return Err(SeckillError::DuplicateOrder);
    }
    orders.push(order.clone());
    Ok(())
}

#[async_trait]
impl OrderRepository for MemorySeckillStore {
    async fn exists(&self, user_id: &str, seckill_id: i64, time: i32) -> SeckillResult<bool> {
        let orders = self.orders.lock().await;
        Ok(orders
            .iter()
            .any(|o| o.user_id == user_id && o.seckill_id == seckill_id && o.seckill_time == time))
    }

    async fn create(&self, order: &OrderInfo) -> SeckillResult<()> {
        let mut orders = self.orders.lock().await;
        insert_unique(&mut orders, order)
    }

    async fn decrement_and_create_order(&self, order: &OrderInfo) -> SeckillResult<bool> {
        // Lock order: products, then orders. Both stay held for the whole update
        let mut products = self.products.lock().await;
        let mut orders = self.orders.lock().await;

        let product = products
            .get_mut(&(order.seckill_id, order.seckill_time))
            .ok_or_else(|| {
                SeckillError::NotFound(format!(
                    "seckill {} at {}",
                    order.seckill_id, order.seckill_time
                ))
            })?;
        if product.stock_count <= 0 {
            return Ok(false);
        }

        insert_unique(&mut orders, order)?;
        product.stock_count -= 1;
        Ok(true)
    }

    async fn find_by_order_no(&self, order_no: &str) -> SeckillResult<Option<OrderInfo>> {
        let orders = self.orders.lock().await;
        Ok(orders.iter().find(|o| o.order_no == order_no).cloned())
    }
}

#[async_trait]
impl SeckillProductRepository for MemorySeckillStore {
    async fn list_by_time(&self, start_date: &str, time: i32) -> SeckillResult<Vec<SeckillProduct>> {
        let products = self.products.lock().await;
        let mut found: Vec<SeckillProduct> = products
            .values()
            .filter(|p| p.time == time && p.start_date == start_date)
            .cloned()
            .collect();
        found.sort_by_key(|p| p.id);
        Ok(found)
    }

    async fn find_by_id_and_time(
        &self,
        id: i64,
        time: i32,
    ) -> SeckillResult<Option<SeckillProduct>> {
        let products = self.products.lock().await;
        Ok(products.get(&(id, time)).cloned())
    }
}
