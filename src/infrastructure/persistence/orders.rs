use crate::domain::entities::OrderInfo;
use crate::domain::errors::SeckillResult;
use crate::domain::ports::order_repository::OrderRepository;
use crate::infrastructure::persistence::Database;
use sqlx::any::AnyArguments;
use sqlx::query::Query;
use sqlx::{Any, Row};

fn insert_order(order: &OrderInfo) -> Query<'_, Any, AnyArguments<'_>> {
    sqlx::query(
        "INSERT INTO order_info (order_no, user_id, product_id, seckill_id, seckill_time,
                                 product_name, product_img, seckill_price, integral, status, create_date)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&order.order_no)
    .bind(&order.user_id)
    .bind(order.product_id)
    .bind(order.seckill_id)
    .bind(i64::from(order.seckill_time))
    .bind(&order.product_name)
    .bind(&order.product_img)
    .bind(order.seckill_price)
    .bind(order.integral)
    .bind(i64::from(order.status))
    .bind(&order.create_date)
}

#[async_trait::async_trait]
impl OrderRepository for Database {
    async fn exists(&self, user_id: &str, seckill_id: i64, time: i32) -> SeckillResult<bool> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM order_info
             WHERE user_id = ? AND seckill_id = ? AND seckill_time = ?",
        )
        .bind(user_id)
        .bind(seckill_id)
        .bind(i64::from(time))
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.try_get("count")?;
        Ok(count > 0)
    }

    async fn create(&self, order: &OrderInfo) -> SeckillResult<()> {
        // The unique (user_id, seckill_id, seckill_time) index turns a racing
        // duplicate into SeckillError::DuplicateOrder.
        insert_order(order).execute(&self.pool).await?;

        tracing::info!(
            "Order created: order_no={}, user_id={}, seckill_id={}",
            order.order_no,
            order.user_id,
            order.seckill_id
        );
        Ok(())
    }

    async fn decrement_and_create_order(&self, order: &OrderInfo) -> SeckillResult<bool> {
        // Start transaction; dropping it before commit rolls both writes back
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE seckill_products SET stock_count = stock_count - 1
             WHERE id = ? AND time = ? AND stock_count > 0",
        )
        .bind(order.seckill_id)
        .bind(i64::from(order.seckill_time))
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        if let Err(e) = insert_order(order).execute(&mut *tx).await {
            tx.rollback().await?;
            return Err(e.into());
        }

        // Commit transaction
        tx.commit().await?;

        tracing::info!(
            "Order created: order_no={}, user_id={}, seckill_id={}",
            order.order_no,
            order.user_id,
            order.seckill_id
        );
        Ok(true)
    }

    async fn find_by_order_no(&self, order_no: &str) -> SeckillResult<Option<OrderInfo>> {
        let row = sqlx::query(
            "SELECT order_no, user_id, product_id, seckill_id, seckill_time, product_name,
                    product_img, seckill_price, integral, status, create_date
             FROM order_info
             WHERE order_no = ?",
        )
        .bind(order_no)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            let seckill_time: i64 = row.try_get("seckill_time")?;
            let status: i64 = row.try_get("status")?;
            Ok(Some(OrderInfo {
                order_no: row.try_get("order_no")?,
                user_id: row.try_get("user_id")?,
                product_id: row.try_get("product_id")?,
                seckill_id: row.try_get("seckill_id")?,
                seckill_time: seckill_time as i32,
                product_name: row.try_get("product_name").ok(),
                product_img: row.try_get("product_img").ok(),
                seckill_price: row.try_get("seckill_price")?,
                integral: row.try_get("integral")?,
                status: status as i32,
                create_date: row.try_get("create_date")?,
            }))
        } else {
            Ok(None)
        }
    }
}
