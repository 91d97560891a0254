use crate::application::services::{SeckillProductService, SeckillService};
use crate::domain::ports::session_resolver::SessionResolver;
use crate::infrastructure::http::middleware::error::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Header carrying the login token issued by the user service.
pub const TOKEN_HEADER: &str = "token";

#[derive(Clone)]
pub struct AppState {
    pub seckill_service: SeckillService,
    pub product_service: SeckillProductService,
    pub session_resolver: Arc<dyn SessionResolver>,
}

/// Resolve the `token` header to a `UserInfo` and store it in request extensions.
pub async fn require_login(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    let user = state
        .session_resolver
        .resolve(&token)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
