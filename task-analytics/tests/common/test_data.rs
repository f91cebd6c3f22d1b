// tests/common/test_data.rs

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sea_orm::DbErr;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use task_analytics::domain::task_metadata::parse_due_date;
use task_analytics::domain::task_model;
use task_analytics::domain::task_status::TaskStatus;
use task_analytics::repository::task_repository::{CountScope, TaskStore};
use uuid::Uuid;

/// メモリ上のタスクストア。件数は全件に対して、サンプルは新しい順に返す
#[derive(Default)]
pub struct InMemoryTaskStore {
    tasks: Mutex<Vec<task_model::Model>>,
    fail: bool,
}

impl InMemoryTaskStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// すべての呼び出しが失敗するストア
    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            tasks: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn insert(&self, task: task_model::Model) {
        self.tasks.lock().unwrap().push(task);
    }

    pub fn all_for(&self, user_id: Uuid) -> Vec<task_model::Model> {
        let mut tasks: Vec<task_model::Model> = self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|task| task.user_id == user_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        tasks
    }

    fn check_available(&self) -> Result<(), DbErr> {
        if self.fail {
            return Err(DbErr::Custom("task store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn count_tasks(&self, user_id: Uuid, scope: CountScope) -> Result<u64, DbErr> {
        self.check_available()?;
        let count = self
            .all_for(user_id)
            .iter()
            .filter(|task| match scope {
                CountScope::All => true,
                CountScope::Status(status) => task.status == status.as_str(),
                CountScope::Overdue(now) => {
                    task.status != TaskStatus::Done.as_str()
                        && task
                            .metadata
                            .as_ref()
                            .and_then(|m| m.get("dueDate"))
                            .and_then(Value::as_str)
                            .and_then(parse_due_date)
                            .is_some_and(|due| due < now)
                }
            })
            .count();
        Ok(count as u64)
    }

    async fn recent_tasks(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<task_model::Model>, DbErr> {
        self.check_available()?;
        Ok(self
            .all_for(user_id)
            .into_iter()
            .take(limit as usize)
            .collect())
    }
}

/// テスト用タスクのビルダー
pub struct TaskBuilder {
    model: task_model::Model,
}

impl TaskBuilder {
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            model: task_model::Model {
                id: Uuid::new_v4(),
                user_id,
                title: "Test task".to_string(),
                description: None,
                status: TaskStatus::Pending.to_string(),
                metadata: None,
                created_at: now,
                updated_at: now,
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.model.title = title.to_string();
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.model.status = status.to_string();
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.model.metadata = Some(metadata);
        self
    }

    pub fn due_in(self, offset: Duration) -> Self {
        let due: DateTime<Utc> = Utc::now() + offset;
        self.metadata(json!({ "dueDate": due.to_rfc3339() }))
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.model.created_at = created_at;
        self.model.updated_at = created_at;
        self
    }

    pub fn build(self) -> task_model::Model {
        self.model
    }
}

/// 10件: 完了4、期限切れの未着手2、進行中2、未着手2
pub fn seed_reference_scenario(store: &InMemoryTaskStore, user_id: Uuid) {
    for i in 0..4 {
        store.insert(
            TaskBuilder::new(user_id)
                .title(&format!("Done {}", i))
                .status(TaskStatus::Done)
                .build(),
        );
    }
    for i in 0..2 {
        store.insert(
            TaskBuilder::new(user_id)
                .title(&format!("Overdue {}", i))
                .due_in(Duration::days(-2))
                .build(),
        );
    }
    for i in 0..2 {
        store.insert(
            TaskBuilder::new(user_id)
                .title(&format!("Working {}", i))
                .status(TaskStatus::InProgress)
                .build(),
        );
    }
    for i in 0..2 {
        store.insert(
            TaskBuilder::new(user_id)
                .title(&format!("Todo {}", i))
                .build(),
        );
    }
}
