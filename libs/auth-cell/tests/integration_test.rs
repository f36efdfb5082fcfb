use std::sync::Arc;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use serde_json::{json, Value};

use auth_cell::router::auth_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::TestConfig;

fn create_test_app(config: AppConfig) -> Router {
    auth_routes(Arc::new(config))
}

async fn post_login(app: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_login_endpoint_issues_token() {
    let config = TestConfig::default().to_app_config();
    let app = create_test_app(config.clone());

    let (status, body) = post_login(app, json!({
        "email": config.admin_email,
        "password": config.admin_password
    })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["token"].as_str().unwrap().split('.').count() == 3);
}

#[tokio::test]
async fn test_login_endpoint_rejects_bad_credentials() {
    let config = TestConfig::default().to_app_config();
    let app = create_test_app(config.clone());

    let (status, body) = post_login(app, json!({
        "email": config.admin_email,
        "password": "not-the-password"
    })).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid credentials");
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_login_endpoint_requires_both_fields() {
    let config = TestConfig::default().to_app_config();
    let app = create_test_app(config);

    let (status, body) = post_login(app, json!({ "email": "admin@clinic.test" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email and password are required");
}

#[tokio::test]
async fn test_login_endpoint_non_json_body_uses_envelope() {
    let config = TestConfig::default().to_app_config();

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("email=admin%40clinic.test&password=x"))
        .unwrap();
    let response = create_test_app(config).oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("JSON"));
}

#[tokio::test]
async fn test_login_endpoint_empty_body_requires_both_fields() {
    let config = TestConfig::default().to_app_config();

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .body(Body::empty())
        .unwrap();
    let response = create_test_app(config).oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "message": "Email and password are required" }));
}
