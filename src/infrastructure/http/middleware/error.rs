use crate::domain::errors::SeckillError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized,
    Seckill(SeckillError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized => write!(f, "Unauthorized"),
            ApiError::Seckill(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Business and lock failures travel as HTTP 200 with a non-200 `code`
        let (status, code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, 400, msg),
            ApiError::Unauthorized | ApiError::Seckill(SeckillError::Unauthorized) => (
                StatusCode::UNAUTHORIZED,
                401,
                SeckillError::Unauthorized.message().to_string(),
            ),
            ApiError::Seckill(err) => {
                if !err.is_business_error() && !err.is_lock_error() {
                    tracing::error!("Request failed: {}", err);
                }
                (StatusCode::OK, err.code(), err.message().to_string())
            }
        };

        let body = Json(json!({
            "code": code,
            "msg": message
        }));

        (status, body).into_response()
    }
}

impl From<SeckillError> for ApiError {
    fn from(err: SeckillError) -> Self {
        ApiError::Seckill(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_error_is_http_ok() {
        let response = ApiError::from(SeckillError::DuplicateOrder).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_unauthorized_is_401() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_bad_request_is_400() {
        let response = ApiError::BadRequest("time".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
