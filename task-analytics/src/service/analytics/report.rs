// task-analytics/src/service/analytics/report.rs

use std::collections::BTreeMap;

use crate::api::dto::analytics_dto::{
    AnalyticsReport, MonthlyTrend, PriorityBreakdown, UpcomingDeadline,
};
use crate::config::AnalyticsConfig;
use crate::service::analytics::deadlines::upcoming_deadlines;
use crate::service::analytics::distribution::{count_tags, priority_breakdown, top_tags};
use crate::service::analytics::scoring::TaskCounts;
use crate::service::analytics::snapshot::TaskSnapshot;
use crate::service::analytics::trends::monthly_trends;
use crate::service::analytics::window::ReportWindow;

/// 集計結果の切り詰め設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub tag_limit: usize,
    pub deadline_limit: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            tag_limit: 20,
            deadline_limit: 10,
        }
    }
}

impl From<&AnalyticsConfig> for ReportOptions {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            tag_limit: config.tag_limit,
            deadline_limit: config.deadline_limit,
        }
    }
}

/// 各部分集計からレポートを組み立てる。完了率とスコアはここでだけ計算する
pub fn assemble_report(
    counts: TaskCounts,
    tasks_by_priority: PriorityBreakdown,
    tasks_by_tag: BTreeMap<String, u64>,
    monthly_trends: Vec<MonthlyTrend>,
    upcoming_deadlines: Vec<UpcomingDeadline>,
) -> AnalyticsReport {
    AnalyticsReport {
        total_tasks: counts.total,
        completed_tasks: counts.completed,
        pending_tasks: counts.pending,
        in_progress_tasks: counts.in_progress,
        completion_rate: counts.completion_rate(),
        overdue_tasks: counts.overdue,
        productivity_score: counts.productivity_score(),
        average_completion_time: 0,
        tasks_by_priority,
        tasks_by_tag,
        monthly_trends,
        upcoming_deadlines,
    }
}

/// 件数以外の部分（分布・推移・期限）をタスク集合から計算してレポートにする
pub fn report_from_sample(
    counts: TaskCounts,
    sample: &[TaskSnapshot],
    window: &ReportWindow,
    options: ReportOptions,
) -> AnalyticsReport {
    assemble_report(
        counts,
        priority_breakdown(sample),
        top_tags(count_tags(sample), options.tag_limit),
        monthly_trends(sample, window.now),
        upcoming_deadlines(sample, window, options.deadline_limit),
    )
}

/// 全タスクを手元に持っている場合の完全なインメモリ集計
pub fn aggregate_tasks(
    tasks: &[TaskSnapshot],
    window: &ReportWindow,
    options: ReportOptions,
) -> AnalyticsReport {
    report_from_sample(TaskCounts::from_tasks(tasks, window), tasks, window, options)
}
