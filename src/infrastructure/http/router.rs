use crate::infrastructure::http::controllers;
use crate::infrastructure::http::middleware::{require_login, AppState};
use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    // Build protected routes (require a login token)
    let protected = Router::new()
        .route(
            "/order/doSeckill",
            get(controllers::orders::do_seckill).post(controllers::orders::do_seckill),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_login,
        ));

    // Build public routes
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/seckillProduct/queryByTime",
            get(controllers::seckill_products::query_by_time),
        )
        .route(
            "/seckillProduct/find",
            get(controllers::seckill_products::find),
        )
        .merge(protected)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "OK"
}
