// task-analytics/src/repository/analytics_repository.rs
use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DbBackend, DbErr, Statement};
use serde_json::Value;
use uuid::Uuid;

use crate::db::DbPool;

const USER_ANALYTICS_SQL: &str = "SELECT get_user_analytics($1, $2, $3, $4, $5) AS report";

/// データストア側の集計ルーチンを呼び出す
#[derive(Clone)]
pub struct AnalyticsRepository {
    db: DbPool,
}

impl AnalyticsRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// `get_user_analytics` の生の JSON。行が返らなければ `None`
    pub async fn fetch_user_aggregate(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        deadline_until: DateTime<Utc>,
        tag_limit: i32,
        deadline_limit: i32,
    ) -> Result<Option<Value>, DbErr> {
        let statement = Statement::from_sql_and_values(
            DbBackend::Postgres,
            USER_ANALYTICS_SQL,
            [
                user_id.into(),
                now.into(),
                deadline_until.into(),
                tag_limit.into(),
                deadline_limit.into(),
            ],
        );

        let Some(row) = self.db.query_one(statement).await? else {
            return Ok(None);
        };
        row.try_get::<Option<Value>>("", "report")
    }
}
