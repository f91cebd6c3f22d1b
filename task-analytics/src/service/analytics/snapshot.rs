// task-analytics/src/service/analytics/snapshot.rs

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::task_model;
use crate::domain::task_priority::TaskPriority;
use crate::domain::task_status::TaskStatus;

/// 集計が読むタスクの不変スナップショット。
///
/// 優先度の補完と期限のパースはここで一度だけ行う。
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSnapshot {
    pub id: Uuid,
    pub title: String,
    /// 列挙外の値は `None`（総数にのみ数える）
    pub status: Option<TaskStatus>,
    pub created_at: DateTime<Utc>,
    pub priority: TaskPriority,
    /// 保存値そのまま
    pub due_date: Option<String>,
    /// `due_date` を解釈できた場合のみ `Some`
    pub due_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl TaskSnapshot {
    pub fn is_done(&self) -> bool {
        self.status == Some(TaskStatus::Done)
    }
}

impl From<&task_model::Model> for TaskSnapshot {
    fn from(model: &task_model::Model) -> Self {
        let metadata = model.parsed_metadata();
        let priority = metadata.effective_priority();
        let due_at = metadata.due_at();

        Self {
            id: model.id,
            title: model.title.clone(),
            status: model.parsed_status(),
            created_at: model.created_at,
            priority,
            due_date: metadata.due_date,
            due_at,
            tags: metadata.tags,
        }
    }
}
