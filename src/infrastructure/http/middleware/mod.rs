pub mod auth;
pub mod error;

pub use auth::{require_login, AppState, TOKEN_HEADER};
pub use error::{ApiError, ApiResult};
