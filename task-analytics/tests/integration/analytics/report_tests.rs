// tests/integration/analytics/report_tests.rs

use axum::{http::StatusCode, Router};
use chrono::Duration;
use serde_json::{json, Value};
use std::sync::Arc;
use task_analytics::config::AppConfig;
use task_analytics::domain::task_status::TaskStatus;
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{
    app_helper::{setup_analytics_app, BulkMode},
    auth_helper, init_test_env,
    request::{create_request, response_json},
    test_data::{seed_reference_scenario, InMemoryTaskStore, TaskBuilder},
};

async fn fetch_report(app: Router, user_id: Uuid) -> Value {
    let token = auth_helper::access_token_for(user_id);
    let response = app
        .oneshot(create_request("GET", "/analytics", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response_json(response).await
}

fn app_with(store: Arc<InMemoryTaskStore>) -> Router {
    setup_analytics_app(AppConfig::for_testing(), store, BulkMode::Available)
}

#[tokio::test]
async fn test_empty_report_for_user_without_tasks() {
    init_test_env();
    let report = fetch_report(app_with(InMemoryTaskStore::new()), Uuid::new_v4()).await;

    assert_eq!(report["totalTasks"], 0);
    assert_eq!(report["completedTasks"], 0);
    assert_eq!(report["pendingTasks"], 0);
    assert_eq!(report["inProgressTasks"], 0);
    assert_eq!(report["overdueTasks"], 0);
    assert_eq!(report["completionRate"], 0.0);
    assert_eq!(report["productivityScore"], 0);
    assert_eq!(report["averageCompletionTime"], 0);
    assert_eq!(
        report["tasksByPriority"],
        json!({"high": 0, "medium": 0, "low": 0})
    );
    assert_eq!(report["tasksByTag"], json!({}));
    assert_eq!(report["upcomingDeadlines"], json!([]));

    let trends = report["monthlyTrends"].as_array().unwrap();
    assert_eq!(trends.len(), 6);
    assert!(trends
        .iter()
        .all(|t| t["created"] == 0 && t["completed"] == 0));
}

#[tokio::test]
async fn test_report_is_returned_without_envelope() {
    init_test_env();
    let report = fetch_report(app_with(InMemoryTaskStore::new()), Uuid::new_v4()).await;

    assert!(report.get("success").is_none());
    assert!(report.get("data").is_none());
    let mut keys: Vec<&str> = report
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "averageCompletionTime",
            "completedTasks",
            "completionRate",
            "inProgressTasks",
            "monthlyTrends",
            "overdueTasks",
            "pendingTasks",
            "productivityScore",
            "tasksByPriority",
            "tasksByTag",
            "totalTasks",
            "upcomingDeadlines",
        ]
    );
}

#[tokio::test]
async fn test_reference_scenario_scores_65() {
    init_test_env();
    let store = InMemoryTaskStore::new();
    let user_id = Uuid::new_v4();
    seed_reference_scenario(&store, user_id);

    let report = fetch_report(app_with(store), user_id).await;

    assert_eq!(report["totalTasks"], 10);
    assert_eq!(report["completedTasks"], 4);
    assert_eq!(report["pendingTasks"], 4);
    assert_eq!(report["inProgressTasks"], 2);
    assert_eq!(report["overdueTasks"], 2);
    assert_eq!(report["completionRate"], 40.0);
    assert_eq!(report["productivityScore"], 65);
    assert_eq!(report["tasksByPriority"]["medium"], 10);

    // 当月に作成された 10 件
    let trends = report["monthlyTrends"].as_array().unwrap();
    assert_eq!(trends[5]["created"], 10);
    assert_eq!(trends[5]["completed"], 4);
}

#[tokio::test]
async fn test_upcoming_deadlines_exclude_done_tasks() {
    init_test_env();
    let store = InMemoryTaskStore::new();
    let user_id = Uuid::new_v4();
    let pending = TaskBuilder::new(user_id)
        .title("Pay rent")
        .due_in(Duration::days(1))
        .build();
    store.insert(pending.clone());
    store.insert(
        TaskBuilder::new(user_id)
            .title("Already paid")
            .status(TaskStatus::Done)
            .due_in(Duration::days(1))
            .build(),
    );

    let report = fetch_report(app_with(store), user_id).await;

    let deadlines = report["upcomingDeadlines"].as_array().unwrap();
    assert_eq!(deadlines.len(), 1);
    assert_eq!(deadlines[0]["taskId"], pending.id.to_string());
    assert_eq!(deadlines[0]["title"], "Pay rent");
    assert_eq!(deadlines[0]["priority"], "medium");
    assert_eq!(
        deadlines[0]["dueDate"],
        pending.metadata.as_ref().unwrap()["dueDate"]
    );
}

#[tokio::test]
async fn test_tags_are_capped_at_twenty() {
    init_test_env();
    let store = InMemoryTaskStore::new();
    let user_id = Uuid::new_v4();
    let tags: Vec<String> = (0..25).map(|i| format!("tag-{:02}", i)).collect();
    store.insert(
        TaskBuilder::new(user_id)
            .metadata(json!({ "tags": tags }))
            .build(),
    );

    let report = fetch_report(app_with(store), user_id).await;

    let by_tag = report["tasksByTag"].as_object().unwrap();
    assert_eq!(by_tag.len(), 20);
    assert!(by_tag.values().all(|count| count == 1));
}

#[tokio::test]
async fn test_malformed_metadata_does_not_fail_report() {
    init_test_env();
    let store = InMemoryTaskStore::new();
    let user_id = Uuid::new_v4();
    store.insert(
        TaskBuilder::new(user_id)
            .metadata(json!({"priority": "URGENT", "dueDate": "someday", "tags": "work"}))
            .build(),
    );
    store.insert(
        TaskBuilder::new(user_id)
            .metadata(json!({"tags": ["ok", 7, null]}))
            .build(),
    );

    let report = fetch_report(app_with(store), user_id).await;

    assert_eq!(report["totalTasks"], 2);
    assert_eq!(report["overdueTasks"], 0);
    assert_eq!(report["tasksByPriority"]["medium"], 2);
    assert_eq!(report["tasksByTag"], json!({"ok": 1}));
    assert_eq!(report["upcomingDeadlines"], json!([]));
}

#[tokio::test]
async fn test_report_only_counts_callers_tasks() {
    init_test_env();
    let store = InMemoryTaskStore::new();
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();
    seed_reference_scenario(&store, other);
    store.insert(TaskBuilder::new(owner).build());

    let report = fetch_report(app_with(store), owner).await;

    assert_eq!(report["totalTasks"], 1);
    assert_eq!(report["pendingTasks"], 1);
}

#[tokio::test]
async fn test_repeated_requests_return_same_report() {
    init_test_env();
    let store = InMemoryTaskStore::new();
    let user_id = Uuid::new_v4();
    seed_reference_scenario(&store, user_id);
    let app = app_with(store);

    let first = fetch_report(app.clone(), user_id).await;
    let second = fetch_report(app, user_id).await;

    assert_eq!(first, second);
}
