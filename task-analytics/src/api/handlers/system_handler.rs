// task-analytics/src/api/handlers/system_handler.rs
use axum::{extract::State, routing::get, Router};
use serde::{Deserialize, Serialize};

use crate::{api::AppState, types::ApiResponse};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
    pub version: String,
}

pub async fn health_handler(State(app_state): State<AppState>) -> ApiResponse<HealthResponse> {
    ApiResponse::success(HealthResponse {
        status: "ok".to_string(),
        environment: app_state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn system_router() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
