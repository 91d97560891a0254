pub mod lease_renewer;
pub mod lock_manager;

pub use lease_renewer::*;
pub use lock_manager::*;
