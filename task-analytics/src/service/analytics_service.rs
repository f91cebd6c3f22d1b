// task-analytics/src/service/analytics_service.rs

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::dto::analytics_dto::AnalyticsReport;
use crate::config::AnalyticsConfig;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::repository::analytics_repository::AnalyticsRepository;
use crate::repository::task_repository::TaskRepository;
use crate::service::analytics::{ReportOptions, ReportWindow};
use crate::service::analytics_cache::AnalyticsCache;
use crate::service::analytics_strategy::{
    AnalyticsStrategy, BulkAnalyticsStrategy, SampledAnalyticsStrategy, StrategyKind,
};

/// レポートの出どころ。ログにのみ使い、レスポンスには含めない
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSource {
    Cache,
    Bulk,
    Sampled,
}

impl From<StrategyKind> for ReportSource {
    fn from(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Bulk => ReportSource::Bulk,
            StrategyKind::Sampled => ReportSource::Sampled,
        }
    }
}

impl fmt::Display for ReportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportSource::Cache => "cache",
            ReportSource::Bulk => "bulk",
            ReportSource::Sampled => "sampled",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct AnalyticsOutcome {
    pub report: AnalyticsReport,
    pub source: ReportSource,
}

/// 分析レポートの境界。一括集計を優先し、失敗したらサンプル集計へ切り替える
pub struct AnalyticsService {
    primary: Arc<dyn AnalyticsStrategy>,
    fallback: Arc<dyn AnalyticsStrategy>,
    cache: AnalyticsCache,
    deadline_window_days: i64,
}

impl AnalyticsService {
    pub fn new(
        primary: Arc<dyn AnalyticsStrategy>,
        fallback: Arc<dyn AnalyticsStrategy>,
        cache: AnalyticsCache,
        config: &AnalyticsConfig,
    ) -> Self {
        Self {
            primary,
            fallback,
            cache,
            deadline_window_days: config.deadline_window_days,
        }
    }

    /// PostgreSQL 上の一括集計とサンプル集計を組み合わせる
    pub fn with_database(
        db_pool: DbPool,
        cache: AnalyticsCache,
        config: &AnalyticsConfig,
    ) -> Self {
        let options = ReportOptions::from(config);
        let primary =
            BulkAnalyticsStrategy::new(AnalyticsRepository::new(db_pool.clone()), options);
        let fallback = SampledAnalyticsStrategy::new(
            Arc::new(TaskRepository::new(db_pool)),
            config.sample_limit,
            options,
        );
        Self::new(Arc::new(primary), Arc::new(fallback), cache, config)
    }

    pub async fn get_user_analytics(&self, user_id: Uuid) -> AppResult<AnalyticsReport> {
        self.generate_report(user_id, Utc::now())
            .await
            .map(|outcome| outcome.report)
    }

    pub async fn generate_report(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<AnalyticsOutcome> {
        if let Some(report) = self.cache.get(user_id).await {
            return Ok(self.finish(user_id, report, ReportSource::Cache));
        }

        let window = ReportWindow::new(now, self.deadline_window_days);
        let ticket = self.cache.ticket();

        let (report, kind) = match self.primary.compute(user_id, &window).await {
            Ok(report) => (report, self.primary.kind()),
            Err(primary_error) => {
                warn!(
                    user_id = %user_id,
                    strategy = %self.primary.kind(),
                    error = %primary_error,
                    "Primary analytics strategy failed, falling back"
                );
                match self.fallback.compute(user_id, &window).await {
                    Ok(report) => (report, self.fallback.kind()),
                    Err(fallback_error) => {
                        error!(
                            user_id = %user_id,
                            strategy = %self.fallback.kind(),
                            error = %fallback_error,
                            "Fallback analytics strategy failed"
                        );
                        return Err(AppError::InternalServerError(format!(
                            "Failed to compute analytics: {}",
                            fallback_error
                        )));
                    }
                }
            }
        };

        self.cache.insert(user_id, ticket, report.clone()).await;
        Ok(self.finish(user_id, report, kind.into()))
    }

    fn finish(
        &self,
        user_id: Uuid,
        report: AnalyticsReport,
        source: ReportSource,
    ) -> AnalyticsOutcome {
        info!(
            user_id = %user_id,
            source = %source,
            total_tasks = report.total_tasks,
            "Analytics report generated"
        );
        AnalyticsOutcome { report, source }
    }
}
