// task-analytics/src/api/handlers/task_handler.rs
use crate::api::dto::task_dto::{CreateTaskDto, TaskListQuery, UpdateTaskDto};
use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::extractors::uuid::ValidatedUuid;
use crate::middleware::auth::AuthenticatedUser;
use crate::types::ApiResponse;
use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use validator::Validate;

// --- CRUD Handlers ---

pub async fn create_task_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateTaskDto>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let task = app_state
        .task_service
        .create_task_for_user(user.user_id(), payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(task)))
}

pub async fn list_tasks_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<TaskListQuery>,
) -> AppResult<impl IntoResponse> {
    let (tasks, pagination) = app_state
        .task_service
        .list_tasks_for_user(user.user_id(), query)
        .await?;

    Ok(ApiResponse::paginated(tasks, pagination))
}

pub async fn get_task_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<impl IntoResponse> {
    let task = app_state
        .task_service
        .get_task_for_user(user.user_id(), id)
        .await?;

    Ok(ApiResponse::success(task))
}

pub async fn update_task_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(id): ValidatedUuid,
    Json(payload): Json<UpdateTaskDto>,
) -> AppResult<impl IntoResponse> {
    if payload.is_empty() {
        return Err(AppError::ValidationError(
            "At least one field must be provided".to_string(),
        ));
    }
    payload.validate()?;

    let task = app_state
        .task_service
        .update_task_for_user(user.user_id(), id, payload)
        .await?;

    Ok(ApiResponse::success(task))
}

pub async fn delete_task_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<StatusCode> {
    app_state
        .task_service
        .delete_task_for_user(user.user_id(), id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn task_router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/{id}",
            get(get_task_handler)
                .patch(update_task_handler)
                .delete(delete_task_handler),
        )
}
