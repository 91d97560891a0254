mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use helpers::*;
use seckill::infrastructure::http::router::build_router;
use serde_json::Value;
use tower::ServiceExt;

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn seckill_request(method: &str, token: Option<&str>, id: i64, time: i32) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(format!("/order/doSeckill?time={}&seckillId={}", time, id));
    if let Some(token) = token {
        builder = builder.header("token", token);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_order_requires_login() {
    let db = setup_test_db().await;
    let sale = seed_sale(&db, 1, 5).await;
    let app = build_router(build_state(&db));

    let (status, body) = send(&app, seckill_request("GET", None, 1, sale.time)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);

    let (status, _) = send(&app, seckill_request("GET", Some("bogus"), 1, sale.time)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(stock_of(&db, 1, sale.time).await, 5);
}

#[tokio::test]
async fn test_order_success_and_duplicate() {
    let db = setup_test_db().await;
    let sale = seed_sale(&db, 1, 5).await;
    login(&db, "tok-1", "13800000001").await;
    let app = build_router(build_state(&db));

    let (status, body) = send(&app, seckill_request("POST", Some("tok-1"), 1, sale.time)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 200);
    assert_eq!(body["msg"], "success");
    assert_eq!(body["data"].as_str().map(str::len), Some(32));

    let (status, body) = send(&app, seckill_request("GET", Some("tok-1"), 1, sale.time)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 50102);

    assert_eq!(stock_of(&db, 1, sale.time).await, 4);
    assert_eq!(order_count(&db, 1).await, 1);
}

#[tokio::test]
async fn test_unknown_sale_and_bad_params() {
    let db = setup_test_db().await;
    let sale = seed_sale(&db, 1, 5).await;
    login(&db, "tok-1", "13800000001").await;
    let app = build_router(build_state(&db));

    let (_, body) = send(&app, seckill_request("GET", Some("tok-1"), 99, sale.time)).await;
    assert_eq!(body["code"], 50104);

    let (status, _) = send(&app, seckill_request("GET", Some("tok-1"), 1, 24)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_listing_endpoints() {
    let db = setup_test_db().await;
    let sale = seed_sale(&db, 1, 5).await;
    let app = build_router(build_state(&db));

    let request = Request::builder()
        .uri(format!("/seckillProduct/queryByTime?time={}", sale.time))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], 1);
    assert_eq!(body["data"][0]["productName"], "Phone");
    assert_eq!(body["data"][0]["stockCount"], 5);

    let request = Request::builder()
        .uri(format!("/seckillProduct/find?time={}&seckillId=1", sale.time))
        .body(Body::empty())
        .unwrap();
    let (_, body) = send(&app, request).await;
    assert_eq!(body["data"]["seckillPrice"], 9.9);

    let request = Request::builder()
        .uri(format!("/seckillProduct/find?time={}&seckillId=7", sale.time))
        .body(Body::empty())
        .unwrap();
    let (_, body) = send(&app, request).await;
    assert_eq!(body["code"], 200);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_health() {
    let db = setup_test_db().await;
    let app = build_router(build_state(&db));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
