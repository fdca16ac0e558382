//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use request_cache::{api::create_router, AppState, CacheGateway, Origin};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_state(capacity: usize) -> AppState {
    let gateway = CacheGateway::new(capacity, 100, 0.01).unwrap();
    AppState::new(gateway, Origin::new(Duration::ZERO))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn post_keys(app: &Router, body: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/resolve")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == Single Resolve Tests ==

#[tokio::test]
async fn test_resolve_endpoint_first_sighting() {
    let app = create_router(create_test_state(2));

    let (status, json) = get(&app, "/resolve/alpha").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "alpha");
    assert_eq!(json["value"], "data:alpha");
    assert_eq!(json["outcome"], "filter_miss");
}

#[tokio::test]
async fn test_resolve_endpoint_promotion_sequence() {
    let state = create_test_state(2);
    let origin = Arc::clone(&state.origin);
    let app = create_router(state);

    let outcomes = [
        get(&app, "/resolve/beta").await.1["outcome"].clone(),
        get(&app, "/resolve/beta").await.1["outcome"].clone(),
        get(&app, "/resolve/beta").await.1["outcome"].clone(),
    ];

    assert_eq!(outcomes[0], "filter_miss");
    assert_eq!(outcomes[1], "filter_hit");
    assert_eq!(outcomes[2], "cache_hit");
    assert_eq!(origin.fetch_count(), 2);
}

#[tokio::test]
async fn test_resolve_endpoint_origin_down() {
    let state = create_test_state(2);
    state.origin.set_available(false);
    let app = create_router(state);

    let (status, json) = get(&app, "/resolve/gamma").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("gamma"));
}

#[tokio::test]
async fn test_resolve_endpoint_key_too_long() {
    let app = create_router(create_test_state(2));
    let uri = format!("/resolve/{}", "k".repeat(300));

    let (status, json) = get(&app, &uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
}

// == Batch Resolve Tests ==

#[tokio::test]
async fn test_batch_resolve_short_sequence() {
    let app = create_router(create_test_state(2));

    let (status, json) = post_keys(&app, r#"{"keys":["A","B","A","C","A"]}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["fetches"], 4);
    let outcomes: Vec<&str> = json["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["outcome"].as_str().unwrap())
        .collect();
    assert_eq!(
        outcomes,
        vec!["filter_miss", "filter_miss", "filter_hit", "filter_miss", "cache_hit"]
    );
}

#[tokio::test]
async fn test_batch_resolve_long_sequence() {
    let gateway = CacheGateway::new(5, 10_000, 0.01).unwrap();
    let app = create_router(AppState::new(gateway, Origin::new(Duration::ZERO)));

    let (status, json) = post_keys(
        &app,
        r#"{"keys":["A","B","A","C","A","D","E","F","A","B","G","A"]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["fetches"], 9);

    let (_, stats) = get(&app, "/stats").await;
    assert_eq!(stats["cached_entries"], 2);
    assert_eq!(stats["cache_hits"], 3);
}

#[tokio::test]
async fn test_batch_resolve_empty_keys() {
    let app = create_router(create_test_state(2));

    let (status, json) = post_keys(&app, r#"{"keys":[]}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_batch_resolve_stops_on_origin_failure() {
    let state = create_test_state(2);
    state.origin.set_available(false);
    let origin = Arc::clone(&state.origin);
    let app = create_router(state);

    let (status, _) = post_keys(&app, r#"{"keys":["A","B"]}"#).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(origin.fetch_count(), 1);
}

// == Stats Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint_reflects_activity() {
    let app = create_router(create_test_state(3));

    get(&app, "/resolve/x").await;
    get(&app, "/resolve/x").await;
    get(&app, "/resolve/x").await;
    let (status, json) = get(&app, "/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["filter_misses"], 1);
    assert_eq!(json["filter_hits"], 1);
    assert_eq!(json["cache_hits"], 1);
    assert_eq!(json["fetches"], 2);
    assert_eq!(json["capacity"], 3);
    assert!(json["filter_bits"].as_u64().unwrap() > 0);
    assert!(json["hit_rate"].as_f64().unwrap() > 0.3);
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_router(create_test_state(2));

    let (status, json) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn test_unknown_route_not_found() {
    let app = create_router(create_test_state(2));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
