// task-analytics/src/api/dto/task_dto.rs
use crate::domain::task_model;
use crate::utils::validation::common;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

// --- Request DTOs ---

/// `metadata` 列に保存される任意属性
#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskMetadataDto {
    #[validate(custom(function = common::validate_task_priority))]
    pub priority: Option<String>,

    #[validate(custom(function = common::validate_due_date))]
    pub due_date: Option<String>,

    #[validate(
        length(
            max = common::task::MAX_TAGS,
            message = "A task can have at most 20 tags"
        ),
        custom(function = common::validate_tags)
    )]
    pub tags: Option<Vec<String>>,
}

impl TaskMetadataDto {
    /// 指定されたキーだけを持つ JSON オブジェクトにする
    pub fn into_json(self) -> Value {
        let mut object = Map::new();
        if let Some(priority) = self.priority {
            object.insert("priority".to_string(), Value::String(priority));
        }
        if let Some(due_date) = self.due_date {
            object.insert("dueDate".to_string(), Value::String(due_date));
        }
        if let Some(tags) = self.tags {
            object.insert(
                "tags".to_string(),
                Value::Array(tags.into_iter().map(Value::String).collect()),
            );
        }
        Value::Object(object)
    }
}

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct CreateTaskDto {
    #[validate(
        length(
            min = common::task::TITLE_MIN_LENGTH,
            max = common::task::TITLE_MAX_LENGTH,
            message = "Task title must be between 1 and 200 characters"
        ),
        custom(function = common::validate_task_title)
    )]
    pub title: String,

    #[validate(length(
        max = common::task::DESCRIPTION_MAX_LENGTH,
        message = "Task description must not exceed 2000 characters"
    ))]
    pub description: Option<String>,

    #[validate(custom(function = common::validate_task_status))]
    pub status: Option<String>, // 省略時は pending

    #[validate(nested)]
    pub metadata: Option<TaskMetadataDto>,
}

#[derive(Deserialize, Serialize, Debug, Default, Validate)]
pub struct UpdateTaskDto {
    #[validate(
        length(
            min = common::task::TITLE_MIN_LENGTH,
            max = common::task::TITLE_MAX_LENGTH,
            message = "Task title must be between 1 and 200 characters"
        ),
        custom(function = common::validate_task_title)
    )]
    pub title: Option<String>,

    #[validate(length(
        max = common::task::DESCRIPTION_MAX_LENGTH,
        message = "Task description must not exceed 2000 characters"
    ))]
    pub description: Option<String>,

    #[validate(custom(function = common::validate_task_status))]
    pub status: Option<String>,

    /// 指定された場合は丸ごと置き換える
    #[validate(nested)]
    pub metadata: Option<TaskMetadataDto>,
}

impl UpdateTaskDto {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.metadata.is_none()
    }
}

#[derive(Deserialize, Debug, Default, Clone, Copy)]
pub struct TaskListQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl TaskListQuery {
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }
}

// --- Response DTOs ---

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TaskDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub metadata: Option<Value>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// SeaORM の Model から TaskDto への変換
impl From<task_model::Model> for TaskDto {
    fn from(model: task_model::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            status: model.status,
            metadata: model.metadata,
            user_id: model.user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
