// task-analytics/src/service/analytics_strategy.rs

//! 分析レポートの計算戦略。
//!
//! - `BulkAnalyticsStrategy`: データストアの集計ルーチンを 1 往復で呼ぶ
//! - `SampledAnalyticsStrategy`: 件数クエリと直近タスクのサンプルからメモリ上で計算する

use async_trait::async_trait;
use sea_orm::DbErr;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::api::dto::analytics_dto::{
    AnalyticsReport, MonthlyTrend, PriorityBreakdown, UpcomingDeadline,
};
use crate::domain::task_priority::TaskPriority;
use crate::domain::task_status::TaskStatus;
use crate::repository::analytics_repository::AnalyticsRepository;
use crate::repository::task_repository::{CountScope, TaskStore};
use crate::service::analytics::distribution::top_tags;
use crate::service::analytics::trends::fill_trend_months;
use crate::service::analytics::{
    assemble_report, report_from_sample, ReportOptions, ReportWindow, TaskCounts, TaskSnapshot,
};

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Task store query failed: {0}")]
    Database(#[from] DbErr),

    #[error("Malformed aggregate payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Analytics unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Bulk,
    Sampled,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Bulk => "bulk",
            StrategyKind::Sampled => "sampled",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait AnalyticsStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    async fn compute(
        &self,
        user_id: Uuid,
        window: &ReportWindow,
    ) -> Result<AnalyticsReport, AnalyticsError>;
}

// --- 一括集計 ---

/// `get_user_analytics` が返す JSON
#[derive(Debug, Deserialize)]
struct BulkAggregate {
    total: u64,
    completed: u64,
    pending: u64,
    in_progress: u64,
    overdue: u64,
    by_priority: PriorityBreakdown,
    #[serde(default)]
    by_tag: Vec<TagCountRow>,
    #[serde(default)]
    monthly: Vec<MonthlyTrend>,
    #[serde(default)]
    deadlines: Vec<DeadlineRow>,
}

#[derive(Debug, Deserialize)]
struct TagCountRow {
    tag: String,
    count: u64,
}

#[derive(Debug, Deserialize)]
struct DeadlineRow {
    task_id: Uuid,
    title: String,
    due_date: String,
    priority: TaskPriority,
}

impl BulkAggregate {
    fn into_report(self, window: &ReportWindow, options: ReportOptions) -> AnalyticsReport {
        let counts = TaskCounts {
            total: self.total,
            completed: self.completed,
            pending: self.pending,
            in_progress: self.in_progress,
            overdue: self.overdue,
        };

        let tasks_by_tag = top_tags(
            self.by_tag.into_iter().map(|row| (row.tag, row.count)),
            options.tag_limit,
        );

        let mut upcoming_deadlines: Vec<UpcomingDeadline> = self
            .deadlines
            .into_iter()
            .map(|row| UpcomingDeadline {
                task_id: row.task_id,
                title: row.title,
                due_date: row.due_date,
                priority: row.priority,
            })
            .collect();
        upcoming_deadlines.truncate(options.deadline_limit);

        assemble_report(
            counts,
            self.by_priority,
            tasks_by_tag,
            fill_trend_months(window.now, self.monthly),
            upcoming_deadlines,
        )
    }
}

pub struct BulkAnalyticsStrategy {
    repository: AnalyticsRepository,
    options: ReportOptions,
}

impl BulkAnalyticsStrategy {
    pub fn new(repository: AnalyticsRepository, options: ReportOptions) -> Self {
        Self {
            repository,
            options,
        }
    }
}

fn sql_limit(limit: usize) -> i32 {
    i32::try_from(limit).unwrap_or(i32::MAX)
}

#[async_trait]
impl AnalyticsStrategy for BulkAnalyticsStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Bulk
    }

    async fn compute(
        &self,
        user_id: Uuid,
        window: &ReportWindow,
    ) -> Result<AnalyticsReport, AnalyticsError> {
        let payload = self
            .repository
            .fetch_user_aggregate(
                user_id,
                window.now,
                window.deadline_until,
                sql_limit(self.options.tag_limit),
                sql_limit(self.options.deadline_limit),
            )
            .await?
            .ok_or_else(|| {
                AnalyticsError::Unavailable("aggregate routine returned no row".to_string())
            })?;

        let aggregate: BulkAggregate = serde_json::from_value(payload)?;
        Ok(aggregate.into_report(window, self.options))
    }
}

// --- サンプル集計 ---

pub struct SampledAnalyticsStrategy {
    store: Arc<dyn TaskStore>,
    sample_limit: u64,
    options: ReportOptions,
}

impl SampledAnalyticsStrategy {
    pub fn new(store: Arc<dyn TaskStore>, sample_limit: u64, options: ReportOptions) -> Self {
        Self {
            store,
            sample_limit,
            options,
        }
    }
}

#[async_trait]
impl AnalyticsStrategy for SampledAnalyticsStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Sampled
    }

    async fn compute(
        &self,
        user_id: Uuid,
        window: &ReportWindow,
    ) -> Result<AnalyticsReport, AnalyticsError> {
        // スカラー件数は全件に対して数える
        let (total, completed, pending, in_progress, overdue) = tokio::try_join!(
            self.store.count_tasks(user_id, CountScope::All),
            self.store
                .count_tasks(user_id, CountScope::Status(TaskStatus::Done)),
            self.store
                .count_tasks(user_id, CountScope::Status(TaskStatus::Pending)),
            self.store
                .count_tasks(user_id, CountScope::Status(TaskStatus::InProgress)),
            self.store
                .count_tasks(user_id, CountScope::Overdue(window.now)),
        )?;
        let counts = TaskCounts {
            total,
            completed,
            pending,
            in_progress,
            overdue,
        };

        // 分布・推移・期限は直近のサンプルから計算する
        let sample: Vec<TaskSnapshot> = self
            .store
            .recent_tasks(user_id, self.sample_limit)
            .await?
            .iter()
            .map(TaskSnapshot::from)
            .collect();

        debug!(
            user_id = %user_id,
            total = total,
            sample_size = sample.len(),
            "Computed analytics from task sample"
        );

        Ok(report_from_sample(counts, &sample, window, self.options))
    }
}
