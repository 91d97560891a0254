use crate::domain::entities::Product;
use crate::domain::errors::SeckillResult;
use async_trait::async_trait;

/// Remote source of product metadata.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn products_by_ids(&self, ids: &[i64]) -> SeckillResult<Vec<Product>>;
}
