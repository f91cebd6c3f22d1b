// task-analytics/src/service/task_service.rs

use crate::api::dto::task_dto::{CreateTaskDto, TaskDto, TaskListQuery, UpdateTaskDto};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::repository::task_repository::TaskRepository;
use crate::service::analytics_cache::AnalyticsCache;
use crate::types::response::ResponsePaginationMeta;
use tracing::info;
use uuid::Uuid;

pub struct TaskService {
    repo: TaskRepository,
    analytics_cache: AnalyticsCache,
}

impl TaskService {
    pub fn new(db_pool: DbPool, analytics_cache: AnalyticsCache) -> Self {
        Self {
            repo: TaskRepository::new(db_pool),
            analytics_cache,
        }
    }

    fn not_found(id: Uuid) -> AppError {
        AppError::NotFound(format!("Task with id {} not found", id))
    }

    pub async fn create_task_for_user(
        &self,
        user_id: Uuid,
        payload: CreateTaskDto,
    ) -> AppResult<TaskDto> {
        let created_task = self.repo.create_for_user(user_id, payload).await?;
        self.analytics_cache.invalidate(user_id).await;

        info!(user_id = %user_id, task_id = %created_task.id, "Task created");
        Ok(created_task.into())
    }

    pub async fn get_task_for_user(&self, user_id: Uuid, id: Uuid) -> AppResult<TaskDto> {
        self.repo
            .find_by_id_for_user(user_id, id)
            .await?
            .map(Into::into)
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn list_tasks_for_user(
        &self,
        user_id: Uuid,
        query: TaskListQuery,
    ) -> AppResult<(Vec<TaskDto>, ResponsePaginationMeta)> {
        let limit = query.limit();
        let offset = query.offset();
        let (tasks, total_items) = self.repo.find_page_for_user(user_id, limit, offset).await?;

        Ok((
            tasks.into_iter().map(Into::into).collect(),
            ResponsePaginationMeta {
                limit,
                offset,
                total_items,
            },
        ))
    }

    pub async fn update_task_for_user(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: UpdateTaskDto,
    ) -> AppResult<TaskDto> {
        let updated_task = self
            .repo
            .update_for_user(user_id, id, payload)
            .await?
            .ok_or_else(|| Self::not_found(id))?;
        self.analytics_cache.invalidate(user_id).await;

        info!(user_id = %user_id, task_id = %id, "Task updated");
        Ok(updated_task.into())
    }

    pub async fn delete_task_for_user(&self, user_id: Uuid, id: Uuid) -> AppResult<()> {
        if !self.repo.delete_for_user(user_id, id).await? {
            return Err(Self::not_found(id));
        }
        self.analytics_cache.invalidate(user_id).await;

        info!(user_id = %user_id, task_id = %id, "Task deleted");
        Ok(())
    }
}
