use crate::domain::entities::UserInfo;
use crate::infrastructure::http::controllers::{validate_time, ApiResponse};
use crate::infrastructure::http::middleware::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SeckillParams {
    pub time: Option<i32>,
    #[serde(rename = "seckillId")]
    pub seckill_id: Option<i64>,
}

/// Place one order. `data` is the new order number.
pub async fn do_seckill(
    State(state): State<AppState>,
    Extension(user): Extension<UserInfo>,
    Query(params): Query<SeckillParams>,
) -> ApiResult<Json<ApiResponse<String>>> {
    let time = validate_time(params.time)?;
    let seckill_id = params
        .seckill_id
        .ok_or_else(|| ApiError::BadRequest("seckillId is required".to_string()))?;

    let order_no = state
        .seckill_service
        .do_seckill(&user, seckill_id, time)
        .await?;
    Ok(Json(ApiResponse::success(order_no)))
}
