pub mod inventory_guard;
pub mod seckill_product_service;
pub mod seckill_service;

pub use inventory_guard::InventoryGuard;
pub use seckill_product_service::SeckillProductService;
pub use seckill_service::SeckillService;
