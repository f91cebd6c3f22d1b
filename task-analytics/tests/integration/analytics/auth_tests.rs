// tests/integration/analytics/auth_tests.rs

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use task_analytics::config::AppConfig;
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{
    app_helper::{setup_analytics_app, BulkMode},
    auth_helper, init_test_env,
    request::{create_anonymous_request, create_request, response_json},
    test_data::InMemoryTaskStore,
};

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    init_test_env();
    let app = setup_analytics_app(
        AppConfig::for_testing(),
        InMemoryTaskStore::new(),
        BulkMode::Available,
    );

    let response = app
        .oneshot(create_anonymous_request("GET", "/analytics"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error_type"], "unauthorized");
}

#[tokio::test]
async fn test_token_with_wrong_signature_is_unauthorized() {
    init_test_env();
    let app = setup_analytics_app(
        AppConfig::for_testing(),
        InMemoryTaskStore::new(),
        BulkMode::Available,
    );
    let token = auth_helper::token_signed_with_other_key(Uuid::new_v4());

    let response = app
        .oneshot(create_request("GET", "/analytics", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    init_test_env();
    let app = setup_analytics_app(
        AppConfig::for_testing(),
        InMemoryTaskStore::new(),
        BulkMode::Available,
    );

    let response = app
        .oneshot(create_request("GET", "/analytics", "not-a-jwt", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_subject_is_bad_request() {
    init_test_env();
    let app = setup_analytics_app(
        AppConfig::for_testing(),
        InMemoryTaskStore::new(),
        BulkMode::Available,
    );
    let token = auth_helper::access_token_with_subject("user-42");

    let response = app
        .oneshot(create_request("GET", "/analytics", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error_type"], "bad_request");
}

#[tokio::test]
async fn test_token_from_cookie_is_accepted() {
    init_test_env();
    let app = setup_analytics_app(
        AppConfig::for_testing(),
        InMemoryTaskStore::new(),
        BulkMode::Available,
    );
    let token = auth_helper::access_token_for(Uuid::new_v4());

    let request = Request::builder()
        .method("GET")
        .uri("/analytics")
        .header(header::COOKIE, format!("access_token={}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
