// tests/integration/tasks/crud_tests.rs

use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value as DbValue};
use serde_json::json;
use std::collections::BTreeMap;
use task_analytics::domain::task_model;
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{
    app_helper::setup_task_app,
    auth_helper, init_test_env,
    request::{create_request, response_json},
    test_data::TaskBuilder,
};

fn count_row(n: i64) -> BTreeMap<&'static str, DbValue> {
    BTreeMap::from([("num_items", DbValue::BigInt(Some(n)))])
}

#[tokio::test]
async fn test_create_task_returns_created_task() {
    init_test_env();
    let user_id = Uuid::new_v4();
    let created = TaskBuilder::new(user_id)
        .title("Write report")
        .metadata(json!({"priority": "high", "tags": ["work"]}))
        .build();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![created.clone()]])
        .into_connection();
    let app = setup_task_app(db);
    let token = auth_helper::access_token_for(user_id);

    let payload = json!({
        "title": "Write report",
        "metadata": {"priority": "high", "tags": ["work"]}
    });
    let response = app
        .oneshot(create_request("POST", "/tasks", &token, Some(&payload)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], created.id.to_string());
    assert_eq!(body["data"]["title"], "Write report");
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["metadata"]["priority"], "high");
}

#[tokio::test]
async fn test_get_task_not_found() {
    init_test_env();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<task_model::Model>::new()])
        .into_connection();
    let app = setup_task_app(db);
    let token = auth_helper::access_token_for(Uuid::new_v4());

    let response = app
        .oneshot(create_request(
            "GET",
            &format!("/tasks/{}", Uuid::new_v4()),
            &token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error_type"], "not_found");
}

#[tokio::test]
async fn test_get_task_with_invalid_id_is_bad_request() {
    init_test_env();
    let app = setup_task_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let token = auth_helper::access_token_for(Uuid::new_v4());

    let response = app
        .oneshot(create_request("GET", "/tasks/not-a-uuid", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_tasks_includes_pagination() {
    init_test_env();
    let user_id = Uuid::new_v4();
    let tasks = vec![
        TaskBuilder::new(user_id).title("Newest").build(),
        TaskBuilder::new(user_id)
            .title("Older")
            .created_at(Utc::now() - chrono::Duration::days(1))
            .build(),
    ];
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(12)]])
        .append_query_results([tasks])
        .into_connection();
    let app = setup_task_app(db);
    let token = auth_helper::access_token_for(user_id);

    let response = app
        .oneshot(create_request("GET", "/tasks?limit=2&offset=10", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["title"], "Newest");
    assert_eq!(
        body["meta"]["pagination"],
        json!({"limit": 2, "offset": 10, "total_items": 12})
    );
}

#[tokio::test]
async fn test_delete_task_returns_no_content() {
    init_test_env();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let app = setup_task_app(db);
    let token = auth_helper::access_token_for(Uuid::new_v4());

    let response = app
        .oneshot(create_request(
            "DELETE",
            &format!("/tasks/{}", Uuid::new_v4()),
            &token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_delete_missing_task_is_not_found() {
    init_test_env();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();
    let app = setup_task_app(db);
    let token = auth_helper::access_token_for(Uuid::new_v4());

    let response = app
        .oneshot(create_request(
            "DELETE",
            &format!("/tasks/{}", Uuid::new_v4()),
            &token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_task_replaces_fields() {
    init_test_env();
    let user_id = Uuid::new_v4();
    let existing = TaskBuilder::new(user_id).title("Draft").build();
    let updated = task_model::Model {
        title: "Final".to_string(),
        status: "done".to_string(),
        ..existing.clone()
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing.clone()]])
        .append_query_results([vec![updated]])
        .into_connection();
    let app = setup_task_app(db);
    let token = auth_helper::access_token_for(user_id);

    let payload = json!({"title": "Final", "status": "done"});
    let response = app
        .oneshot(create_request(
            "PATCH",
            &format!("/tasks/{}", existing.id),
            &token,
            Some(&payload),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["title"], "Final");
    assert_eq!(body["data"]["status"], "done");
}

#[tokio::test]
async fn test_tasks_require_authentication() {
    init_test_env();
    let app = setup_task_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(crate::common::request::create_anonymous_request("GET", "/tasks"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
