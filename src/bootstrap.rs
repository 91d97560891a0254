use crate::application::services::{InventoryGuard, SeckillProductService, SeckillService};
use crate::config::Config;
use crate::domain::ports::{
    lease_store::LeaseStore, order_repository::OrderRepository,
    product_catalog::ProductCatalog, seckill_product_repository::SeckillProductRepository,
    session_resolver::SessionResolver, stock_repository::StockRepository,
    time_service::TimeService,
};
use crate::domain::services::{LeaseRenewer, LockManager};
use crate::infrastructure::http::middleware::AppState;
use crate::infrastructure::persistence::distributed_lock::SqlLeaseStore;
use crate::infrastructure::persistence::Database;
use crate::infrastructure::providers::HttpProductCatalog;
use crate::infrastructure::runtime::tokio::TokioTimeService;
use std::sync::Arc;

/// Wire the SQL-backed stores and the HTTP catalog into the application services.
pub fn build_app_state(
    db: Database,
    config: &Config,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let catalog: Arc<dyn ProductCatalog> = Arc::new(HttpProductCatalog::new(
        &config.catalog_base_url,
        config.catalog_timeout(),
    )?);
    tracing::info!("Product catalog at {}", config.catalog_base_url);

    Ok(build_app_state_with_catalog(db, config, catalog))
}

/// Same as [`build_app_state`] with the product catalog supplied by the caller.
pub fn build_app_state_with_catalog(
    db: Database,
    config: &Config,
    catalog: Arc<dyn ProductCatalog>,
) -> AppState {
    let time_service: Arc<dyn TimeService> = Arc::new(TokioTimeService::new());
    let policy = config.lock_policy();

    let lease_store: Arc<dyn LeaseStore> = Arc::new(SqlLeaseStore::new(db.clone()));
    let guard = InventoryGuard::new(
        LockManager::new(lease_store.clone(), time_service.clone(), policy.clone()),
        LeaseRenewer::new(lease_store, time_service.clone(), policy.clone()),
    );
    tracing::info!(
        "Stock lock: ttl={:?}, attempts={}, retry_delay={:?}, renew_ratio={}, renew_margin={:?}",
        config.lock_ttl(),
        policy.max_attempts,
        policy.retry_delay,
        policy.renew_ratio,
        policy.renew_margin
    );

    let product_repo: Arc<dyn SeckillProductRepository> = Arc::new(db.clone());
    let stock_repo: Arc<dyn StockRepository> = Arc::new(db.clone());
    let order_repo: Arc<dyn OrderRepository> = Arc::new(db.clone());
    let session_resolver: Arc<dyn SessionResolver> = Arc::new(db);

    let product_service =
        SeckillProductService::new(product_repo, catalog, time_service.clone());

    let seckill_service = SeckillService::new(
        product_service.clone(),
        stock_repo,
        order_repo,
        guard,
        time_service,
        config.lock_ttl(),
        config.sale_window_hours,
    );

    AppState {
        seckill_service,
        product_service,
        session_resolver,
    }
}
