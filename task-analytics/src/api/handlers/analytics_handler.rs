// task-analytics/src/api/handlers/analytics_handler.rs

use crate::api::dto::analytics_dto::AnalyticsReport;
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use axum::{
    extract::{Json, State},
    routing::get,
    Router,
};

/// 認証ユーザー自身の分析レポート。レポート本体をそのまま返す
pub async fn get_user_analytics_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<AnalyticsReport>> {
    let report = app_state
        .analytics_service
        .get_user_analytics(user.user_id())
        .await?;

    Ok(Json(report))
}

pub fn analytics_router() -> Router<AppState> {
    Router::new().route("/analytics", get(get_user_analytics_handler))
}
