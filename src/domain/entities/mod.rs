pub mod lock;
pub mod order;
pub mod seckill_product;
pub mod user;

pub use lock::*;
pub use order::*;
pub use seckill_product::*;
pub use user::*;
