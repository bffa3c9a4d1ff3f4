//! Input checks that reject requests before anything is written.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use coinwatch::routes;
use common::{CountingLookup, MemoryUserStore, body_json, json_request, sample_user, state_with};
use serde_json::json;
use tower::ServiceExt;

async fn app() -> axum::Router {
    let lookup = Arc::new(CountingLookup::resolving_to(sample_user("v@example.com")));
    routes::app(state_with(Arc::new(MemoryUserStore::default()), lookup).await)
}

#[tokio::test]
async fn alert_with_non_positive_target_is_bad_request() {
    let app = app().await;

    for target in [0.0, -10.0] {
        let req = json_request(
            "POST",
            "/alerts",
            Some("tok"),
            json!({ "coinId": "bitcoin", "condition": "above", "targetPrice": target }),
        );
        let res = app.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "target {target}");
    }
}

#[tokio::test]
async fn alert_with_blank_coin_is_bad_request() {
    let req = json_request(
        "POST",
        "/alerts",
        Some("tok"),
        json!({ "coinId": "   ", "condition": "below", "targetPrice": 10.0 }),
    );
    let res = app().await.oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["message"], "coinId is required.");
}

#[tokio::test]
async fn alert_with_unknown_condition_is_rejected() {
    let req = json_request(
        "POST",
        "/alerts",
        Some("tok"),
        json!({ "coinId": "bitcoin", "condition": "sideways", "targetPrice": 10.0 }),
    );
    let res = app().await.oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["statusCode"], 400);
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"].as_str().unwrap().contains("condition"));
}

#[tokio::test]
async fn unparseable_body_uses_error_envelope() {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/alerts")
        .header("content-type", "application/json")
        .header("authorization", "Bearer tok")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let res = app().await.oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["statusCode"], 400);
}

#[tokio::test]
async fn missing_content_type_is_bad_request() {
    let req = axum::http::Request::builder()
        .method("PUT")
        .uri("/portfolio/benchmark")
        .header("authorization", "Bearer tok")
        .body(axum::body::Body::from(r#"{"value": 1.0}"#))
        .unwrap();
    let res = app().await.oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["error"], "Bad Request");
}

#[tokio::test]
async fn delete_alert_with_malformed_id_is_bad_request() {
    let req = json_request("DELETE", "/alerts/not-an-object-id", Some("tok"), json!({}));
    let res = app().await.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blank_chat_message_is_bad_request() {
    let req = json_request(
        "POST",
        "/chat/messages",
        Some("tok"),
        json!({ "role": "user", "content": "  \n " }),
    );
    let res = app().await.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let req = json_request("GET", "/nope", None, json!({}));
    let res = app().await.oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = body_json(res).await;
    assert_eq!(body["statusCode"], 404);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn health_is_ok() {
    let req = json_request("GET", "/health", None, json!({}));
    let res = app().await.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["status"], "ok");
}
