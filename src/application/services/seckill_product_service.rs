use crate::domain::entities::{Product, SeckillProductVo};
use crate::domain::errors::{SeckillError, SeckillResult};
use crate::domain::ports::{
    product_catalog::ProductCatalog, seckill_product_repository::SeckillProductRepository,
    time_service::TimeService,
};
use chrono::Local;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct SeckillProductService {
    repo: Arc<dyn SeckillProductRepository>,
    catalog: Arc<dyn ProductCatalog>,
    time_service: Arc<dyn TimeService>,
}

impl SeckillProductService {
    pub fn new(
        repo: Arc<dyn SeckillProductRepository>,
        catalog: Arc<dyn ProductCatalog>,
        time_service: Arc<dyn TimeService>,
    ) -> Self {
        Self {
            repo,
            catalog,
            time_service,
        }
    }

    /// Today's sale rows for the `time` session, merged with catalog metadata.
    pub async fn list_by_time(&self, time: i32) -> SeckillResult<Vec<SeckillProductVo>> {
        let today = self
            .time_service
            .now()
            .with_timezone(&Local)
            .format("%Y-%m-%d")
            .to_string();

        let sales = self.repo.list_by_time(&today, time).await?;
        if sales.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<i64> = sales.iter().map(|s| s.product_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let products: HashMap<i64, Product> = self
            .catalog
            .products_by_ids(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(sales
            .iter()
            .map(|sale| SeckillProductVo::merge(sale, products.get(&sale.product_id)))
            .collect())
    }

    /// One sale row with its product metadata. `None` when no such sale exists.
    pub async fn find_by_id_and_time(
        &self,
        seckill_id: i64,
        time: i32,
    ) -> SeckillResult<Option<SeckillProductVo>> {
        let Some(sale) = self.repo.find_by_id_and_time(seckill_id, time).await? else {
            return Ok(None);
        };

        let products = self.catalog.products_by_ids(&[sale.product_id]).await?;
        let product = products
            .iter()
            .find(|p| p.id == sale.product_id)
            .ok_or_else(|| {
                SeckillError::RemoteService(format!(
                    "product {} missing from catalog",
                    sale.product_id
                ))
            })?;

        Ok(Some(SeckillProductVo::merge(&sale, Some(product))))
    }
}
