use crate::domain::entities::SeckillProductVo;
use crate::infrastructure::http::controllers::{validate_time, ApiResponse};
use crate::infrastructure::http::middleware::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct QueryByTimeParams {
    pub time: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct FindParams {
    pub time: Option<i32>,
    #[serde(rename = "seckillId")]
    pub seckill_id: Option<i64>,
}

pub async fn query_by_time(
    State(state): State<AppState>,
    Query(params): Query<QueryByTimeParams>,
) -> ApiResult<Json<ApiResponse<Vec<SeckillProductVo>>>> {
    let time = validate_time(params.time)?;
    let products = state.product_service.list_by_time(time).await?;
    Ok(Json(ApiResponse::success(products)))
}

pub async fn find(
    State(state): State<AppState>,
    Query(params): Query<FindParams>,
) -> ApiResult<Json<ApiResponse<Option<SeckillProductVo>>>> {
    let time = validate_time(params.time)?;
    let seckill_id = params
        .seckill_id
        .ok_or_else(|| ApiError::BadRequest("seckillId is required".to_string()))?;

    let product = state
        .product_service
        .find_by_id_and_time(seckill_id, time)
        .await?;
    Ok(Json(ApiResponse::success(product)))
}
