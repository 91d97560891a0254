pub mod lease_store;
pub mod order_repository;
pub mod product_catalog;
pub mod seckill_product_repository;
pub mod session_resolver;
pub mod stock_repository;
pub mod time_service;
