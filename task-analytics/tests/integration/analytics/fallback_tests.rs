// tests/integration/analytics/fallback_tests.rs

use axum::{http::StatusCode, Router};
use chrono::Duration;
use serde_json::{json, Value};
use std::sync::Arc;
use task_analytics::config::AppConfig;
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{
    app_helper::{setup_analytics_app, BulkMode},
    auth_helper, init_test_env,
    request::{create_request, response_json},
    test_data::{seed_reference_scenario, InMemoryTaskStore, TaskBuilder},
};

async fn get_analytics(app: Router, user_id: Uuid) -> (StatusCode, Value) {
    let token = auth_helper::access_token_for(user_id);
    let response = app
        .oneshot(create_request("GET", "/analytics", &token, None))
        .await
        .unwrap();
    let status = response.status();
    (status, response_json(response).await)
}

#[tokio::test]
async fn test_falls_back_when_bulk_aggregation_is_unavailable() {
    init_test_env();
    let store = InMemoryTaskStore::new();
    let user_id = Uuid::new_v4();
    seed_reference_scenario(&store, user_id);

    let app = setup_analytics_app(AppConfig::for_testing(), store, BulkMode::Unavailable);
    let (status, report) = get_analytics(app, user_id).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["totalTasks"], 10);
    assert_eq!(report["completionRate"], 40.0);
    assert_eq!(report["productivityScore"], 65);
}

/// サンプル集計と、全件をメモリ上で集計する戦略の一致を見る。
/// どちらも同じ集計関数を通るため、SQL 側の `get_user_analytics` との一致はここでは検証しない
#[tokio::test]
async fn test_sampled_path_matches_in_memory_full_aggregation() {
    init_test_env();
    let store = InMemoryTaskStore::new();
    let user_id = Uuid::new_v4();
    seed_reference_scenario(&store, user_id);
    store.insert(
        TaskBuilder::new(user_id)
            .title("Release")
            .metadata(json!({
                "priority": "high",
                "dueDate": (chrono::Utc::now() + Duration::days(3)).to_rfc3339(),
                "tags": ["work", "release"]
            }))
            .build(),
    );
    store.insert(
        TaskBuilder::new(user_id)
            .metadata(json!({"priority": "low", "tags": ["home", "work"]}))
            .build(),
    );

    let bulk_app = setup_analytics_app(
        AppConfig::for_testing(),
        Arc::clone(&store),
        BulkMode::Available,
    );
    let fallback_app =
        setup_analytics_app(AppConfig::for_testing(), store, BulkMode::Unavailable);

    let (_, bulk) = get_analytics(bulk_app, user_id).await;
    let (_, fallback) = get_analytics(fallback_app, user_id).await;

    for key in [
        "totalTasks",
        "completedTasks",
        "pendingTasks",
        "inProgressTasks",
        "overdueTasks",
        "completionRate",
        "productivityScore",
        "tasksByPriority",
        "tasksByTag",
        "upcomingDeadlines",
    ] {
        assert_eq!(bulk[key], fallback[key], "mismatch in {}", key);
    }
    assert_eq!(bulk["tasksByTag"]["work"], 2);
}

#[tokio::test]
async fn test_returns_generic_error_when_both_strategies_fail() {
    init_test_env();
    let app = setup_analytics_app(
        AppConfig::for_testing(),
        InMemoryTaskStore::unavailable(),
        BulkMode::Unavailable,
    );

    let (status, body) = get_analytics(app, Uuid::new_v4()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "An internal server error occurred");
    // 内部の原因は返さない
    assert!(!body.to_string().contains("unavailable"));
}
