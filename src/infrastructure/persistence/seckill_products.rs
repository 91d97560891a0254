use crate::domain::entities::SeckillProduct;
use crate::domain::errors::SeckillResult;
use crate::domain::ports::seckill_product_repository::SeckillProductRepository;
use crate::domain::ports::stock_repository::StockRepository;
use crate::infrastructure::persistence::Database;
use sqlx::any::AnyRow;
use sqlx::Row;

fn map_seckill_product(row: &AnyRow) -> Result<SeckillProduct, sqlx::Error> {
    let time: i64 = row.try_get("time")?;
    Ok(SeckillProduct {
        id: row.try_get("id")?,
        product_id: row.try_get("product_id")?,
        seckill_price: row.try_get("seckill_price")?,
        integral: row.try_get("integral")?,
        stock_count: row.try_get("stock_count")?,
        start_date: row.try_get("start_date")?,
        time: time as i32,
    })
}

impl Database {
    /// Insert a sale row (admin seeding and tests).
    pub async fn create_seckill_product(&self, product: &SeckillProduct) -> SeckillResult<()> {
        sqlx::query(
            "INSERT INTO seckill_products (id, product_id, seckill_price, integral, stock_count, start_date, time)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(product.id)
        .bind(product.product_id)
        .bind(product.seckill_price)
        .bind(product.integral)
        .bind(product.stock_count)
        .bind(&product.start_date)
        .bind(i64::from(product.time))
        .execute(&self.pool)
        .await?;

        tracing::info!(
            "Seckill product created: id={}, time={}, stock={}",
            product.id,
            product.time,
            product.stock_count
        );
        Ok(())
    }
}

#[async_trait::async_trait]
impl SeckillProductRepository for Database {
    async fn list_by_time(&self, start_date: &str, time: i32) -> SeckillResult<Vec<SeckillProduct>> {
        let rows = sqlx::query(
            "SELECT id, product_id, seckill_price, integral, stock_count, start_date, time
             FROM seckill_products
             WHERE start_date = ? AND time = ?
             ORDER BY id",
        )
        .bind(start_date)
        .bind(i64::from(time))
        .fetch_all(&self.pool)
        .await?;

        let mut products = Vec::with_capacity(rows.len());
        for row in &rows {
            products.push(map_seckill_product(row)?);
        }
        Ok(products)
    }

    async fn find_by_id_and_time(
        &self,
        id: i64,
        time: i32,
    ) -> SeckillResult<Option<SeckillProduct>> {
        let row = sqlx::query(
            "SELECT id, product_id, seckill_price, integral, stock_count, start_date, time
             FROM seckill_products
             WHERE id = ? AND time = ?",
        )
        .bind(id)
        .bind(i64::from(time))
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(map_seckill_product(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait::async_trait]
impl StockRepository for Database {
    async fn read_count(&self, seckill_id: i64, time: i32) -> SeckillResult<Option<i64>> {
        let count: Option<(i64,)> =
            sqlx::query_as("SELECT stock_count FROM seckill_products WHERE id = ? AND time = ?")
                .bind(seckill_id)
                .bind(i64::from(time))
                .fetch_optional(&self.pool)
                .await?;
        Ok(count.map(|(count,)| count))
    }
}
