pub mod orders;
pub mod seckill_products;

use crate::infrastructure::http::middleware::ApiError;
use serde::Serialize;

/// Success envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            msg: "success".to_string(),
            data,
        }
    }
}

/// Sale sessions start on the hour, so `time` is an hour of day.
pub(crate) fn validate_time(time: Option<i32>) -> Result<i32, ApiError> {
    match time {
        Some(t) if (0..24).contains(&t) => Ok(t),
        Some(t) => Err(ApiError::BadRequest(format!(
            "time must be an hour between 0 and 23, got {}",
            t
        ))),
        None => Err(ApiError::BadRequest(
            "time is required".to_string(),
        )),
    }
}
