// tests/common/request.rs
use axum::{
    body::{self, Body},
    http::{header, Method, Request, Response},
};
use serde_json::Value;

/// 認証付きのHTTPリクエストを作成
pub fn create_request(method: &str, uri: &str, token: &str, body: Option<&Value>) -> Request<Body> {
    let method = Method::from_bytes(method.as_bytes()).unwrap();
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// 認証ヘッダー無しのリクエスト
pub fn create_anonymous_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::from_bytes(method.as_bytes()).unwrap())
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn response_json(response: Response<Body>) -> Value {
    let body_bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).expect("Failed to parse JSON")
}
