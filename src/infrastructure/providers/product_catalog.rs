use crate::domain::entities::Product;
use crate::domain::errors::{SeckillError, SeckillResult};
use crate::domain::ports::product_catalog::ProductCatalog;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// `{code, msg, data}` envelope returned by the product service.
#[derive(Debug, Deserialize)]
struct CatalogResponse<T> {
    code: i32,
    msg: Option<String>,
    data: Option<T>,
}

impl<T> CatalogResponse<T> {
    fn into_result(self) -> SeckillResult<T> {
        match self.data {
            Some(data) if self.code == 200 => Ok(data),
            _ => Err(SeckillError::RemoteService(format!(
                "catalog returned code {}: {}",
                self.code,
                self.msg.unwrap_or_default()
            ))),
        }
    }
}

/// Product catalog reached over HTTP.
#[derive(Clone)]
pub struct HttpProductCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProductCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> SeckillResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ProductCatalog for HttpProductCatalog {
    async fn products_by_ids(&self, ids: &[i64]) -> SeckillResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let response = self
            .client
            .get(format!("{}/product/selectByIdList", self.base_url))
            .query(&[("ids", joined)])
            .send()
            .await?
            .error_for_status()?;

        let body: CatalogResponse<Vec<Product>> = response.json().await?;
        body.into_result().map_err(|e| {
            tracing::error!("Product catalog lookup failed for {:?}: {}", ids, e);
            e
        })
    }
}

/// Fixed product list, for tests and local runs without a catalog service.
#[derive(Clone, Default)]
pub struct StaticProductCatalog {
    products: Vec<Product>,
}

impl StaticProductCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl ProductCatalog for StaticProductCatalog {
    async fn products_by_ids(&self, ids: &[i64]) -> SeckillResult<Vec<Product>> {
        Ok(self
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn phone() -> Product {
        Product {
            id: 42,
            product_name: "Phone".to_string(),
            product_title: None,
            product_img: Some("/img/phone.png".to_string()),
            product_detail: None,
            product_price: 4999.0,
        }
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_envelope_error_code() {
        let body: CatalogResponse<Vec<Product>> =
            serde_json::from_value(json!({"code": 500102, "msg": "degraded", "data": null}))
                .unwrap();
        let err = body.into_result().unwrap_err();
        assert!(matches!(err, SeckillError::RemoteService(ref m) if m.contains("degraded")));
    }

    #[tokio::test]
    async fn test_http_catalog_fetches_products() {
        let app = Router::new().route(
            "/product/selectByIdList",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("ids").map(String::as_str), Some("42,43"));
                Json(json!({
                    "code": 200,
                    "msg": "success",
                    "data": [{
                        "id": 42,
                        "productName": "Phone",
                        "productImg": "/img/phone.png",
                        "productPrice": 4999.0
                    }]
                }))
            }),
        );
        let base_url = serve(app).await;

        let catalog = HttpProductCatalog::new(&base_url, Duration::from_secs(2)).unwrap();
        let products = catalog.products_by_ids(&[42, 43]).await.unwrap();

        assert_eq!(products, vec![phone()]);
    }

    #[tokio::test]
    async fn test_http_catalog_maps_server_error() {
        let app = Router::new().route(
            "/product/selectByIdList",
            get(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, Json(Value::Null)) }),
        );
        let base_url = serve(app).await;

        let catalog = HttpProductCatalog::new(&base_url, Duration::from_secs(2)).unwrap();
        let err = catalog.products_by_ids(&[1]).await.unwrap_err();

        assert!(matches!(err, SeckillError::RemoteService(_)));
    }

    #[tokio::test]
    async fn test_static_catalog_filters_by_id() {
        let catalog = StaticProductCatalog::new(vec![phone()]);
        assert_eq!(catalog.products_by_ids(&[42]).await.unwrap().len(), 1);
        assert!(catalog.products_by_ids(&[7]).await.unwrap().is_empty());
    }
}
