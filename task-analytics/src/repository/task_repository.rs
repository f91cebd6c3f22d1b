// task-analytics/src/repository/task_repository.rs
use crate::api::dto::task_dto::{CreateTaskDto, UpdateTaskDto};
use crate::db::DbPool;
use crate::domain::task_model::{self, ActiveModel as TaskActiveModel, Entity as TaskEntity};
use crate::domain::task_status::TaskStatus;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{entity::*, query::*, DbErr, Set};
use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

/// 件数を数える対象
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountScope {
    All,
    Status(TaskStatus),
    /// 未完了かつ期限が `now` より前
    Overdue(DateTime<Utc>),
}

/// 分析が読み取りに使うタスクストア
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn count_tasks(&self, user_id: Uuid, scope: CountScope) -> Result<u64, DbErr>;

    /// 作成日時の新しい順に最大 `limit` 件
    async fn recent_tasks(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<task_model::Model>, DbErr>;
}

#[derive(Clone)]
pub struct TaskRepository {
    db: DbPool,
}

impl TaskRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub async fn find_by_id_for_user(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<task_model::Model>, DbErr> {
        TaskEntity::find_by_id(id)
            .filter(task_model::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
    }

    /// 新しい順のページと総件数
    pub async fn find_page_for_user(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<task_model::Model>, u64), DbErr> {
        let query = TaskEntity::find()
            .filter(task_model::Column::UserId.eq(user_id))
            .order_by_desc(task_model::Column::CreatedAt)
            .order_by_desc(task_model::Column::Id);

        let total_items = query.clone().count(self.db.as_ref()).await?;
        let tasks = query.limit(limit).offset(offset).all(self.db.as_ref()).await?;

        Ok((tasks, total_items))
    }

    pub async fn create_for_user(
        &self,
        user_id: Uuid,
        payload: CreateTaskDto,
    ) -> Result<task_model::Model, DbErr> {
        let status = payload
            .status
            .as_deref()
            .and_then(TaskStatus::from_str)
            .unwrap_or_default();

        let new_task = TaskActiveModel {
            user_id: Set(user_id),
            title: Set(payload.title),
            description: Set(payload.description),
            status: Set(status.to_string()),
            metadata: Set(payload.metadata.map(|metadata| metadata.into_json())),
            ..Default::default()
        };
        new_task.insert(self.db.as_ref()).await
    }

    pub async fn update_for_user(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: UpdateTaskDto,
    ) -> Result<Option<task_model::Model>, DbErr> {
        let Some(task) = self.find_by_id_for_user(user_id, id).await? else {
            return Ok(None);
        };

        if payload.is_empty() {
            return Ok(Some(task));
        }

        let mut active_model: TaskActiveModel = task.into();
        if let Some(title) = payload.title {
            active_model.title = Set(title);
        }
        if let Some(description) = payload.description {
            active_model.description = Set(Some(description));
        }
        if let Some(status) = payload.status.as_deref().and_then(TaskStatus::from_str) {
            active_model.status = Set(status.to_string());
        }
        if let Some(metadata) = payload.metadata {
            active_model.metadata = Set(Some(metadata.into_json()));
        }

        active_model.update(self.db.as_ref()).await.map(Some)
    }

    /// 削除できた場合 `true`
    pub async fn delete_for_user(&self, user_id: Uuid, id: Uuid) -> Result<bool, DbErr> {
        let result = TaskEntity::delete_many()
            .filter(task_model::Column::Id.eq(id))
            .filter(task_model::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl TaskStore for TaskRepository {
    async fn count_tasks(&self, user_id: Uuid, scope: CountScope) -> Result<u64, DbErr> {
        let query = TaskEntity::find().filter(task_model::Column::UserId.eq(user_id));

        let query = match scope {
            CountScope::All => query,
            CountScope::Status(status) => {
                query.filter(task_model::Column::Status.eq(status.as_str()))
            }
            CountScope::Overdue(now) => query
                .filter(task_model::Column::Status.ne(TaskStatus::Done.as_str()))
                .filter(Expr::cust_with_values(
                    "safe_timestamptz(metadata->>'dueDate') < $1",
                    [now],
                )),
        };

        query.count(self.db.as_ref()).await
    }

    async fn recent_tasks(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<task_model::Model>, DbErr> {
        TaskEntity::find()
            .filter(task_model::Column::UserId.eq(user_id))
            .order_by_desc(task_model::Column::CreatedAt)
            .order_by_desc(task_model::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
    }
}
