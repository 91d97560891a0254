use chrono::{Local, Timelike};
use seckill::bootstrap;
use seckill::config::Config;
use seckill::domain::entities::{Product, SeckillProduct, UserInfo};
use seckill::infrastructure::http::middleware::AppState;
use seckill::infrastructure::persistence::Database;
use seckill::infrastructure::providers::StaticProductCatalog;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub async fn setup_test_db() -> Database {
    // Unique file per test so tests can run in parallel
    let path = std::env::temp_dir().join(format!("seckill_test_{}.db", Uuid::new_v4()));
    let db_url = format!("sqlite://{}?mode=rwc", path.display());

    let db = Database::connect(&db_url)
        .await
        .expect("Failed to connect to test database");

    db.run_migrations()
        .await
        .expect("Failed to run migrations");

    db
}

/// Config with lock retries generous enough for heavily contended tests.
pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("LOCK_TTL_MS", "5000"),
        ("LOCK_MAX_ATTEMPTS", "5000"),
        ("LOCK_RETRY_DELAY_MS", "2"),
    ]);
    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
        .expect("test config is valid")
}

pub fn test_product() -> Product {
    Product {
        id: 42,
        product_name: "Phone".to_string(),
        product_title: Some("Flagship phone".to_string()),
        product_img: Some("/img/phone.png".to_string()),
        product_detail: None,
        product_price: 4999.0,
    }
}

pub fn build_state(db: &Database) -> AppState {
    let catalog = Arc::new(StaticProductCatalog::new(vec![test_product()]));
    bootstrap::build_app_state_with_catalog(db.clone(), &test_config(), catalog)
}

/// Sale row whose window is open right now.
pub fn open_sale(id: i64, stock_count: i64) -> SeckillProduct {
    let now = Local::now();
    SeckillProduct {
        id,
        product_id: 42,
        seckill_price: 9.9,
        integral: 100,
        stock_count,
        start_date: now.format("%Y-%m-%d").to_string(),
        time: now.hour() as i32,
    }
}

pub async fn seed_sale(db: &Database, id: i64, stock_count: i64) -> SeckillProduct {
    let sale = open_sale(id, stock_count);
    db.create_seckill_product(&sale)
        .await
        .expect("Failed to seed seckill product");
    sale
}

pub async fn login(db: &Database, token: &str, phone: &str) -> UserInfo {
    let user = UserInfo::new(phone);
    db.create_user_token(token, &user, Duration::from_secs(3600))
        .await
        .expect("Failed to create user token");
    user
}

pub async fn stock_of(db: &Database, id: i64, time: i32) -> i64 {
    let (count,): (i64,) =
        sqlx::query_as("SELECT stock_count FROM seckill_products WHERE id = ? AND time = ?")
            .bind(id)
            .bind(i64::from(time))
            .fetch_one(db.pool())
            .await
            .expect("Failed to read stock");
    count
}

pub async fn order_count(db: &Database, seckill_id: i64) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM order_info WHERE seckill_id = ?")
        .bind(seckill_id)
        .fetch_one(db.pool())
        .await
        .expect("Failed to count orders");
    count
}
