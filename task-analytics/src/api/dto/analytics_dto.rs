// task-analytics/src/api/dto/analytics_dto.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::task_priority::TaskPriority;

/// ユーザー単位の分析レポート。リクエストごとに再計算され、永続化はしない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub pending_tasks: u64,
    pub in_progress_tasks: u64,
    pub completion_rate: f64,
    pub overdue_tasks: u64,
    pub productivity_score: u8,
    /// 予約済みフィールド。完了日時を保持していないため常に 0
    pub average_completion_time: u64,
    pub tasks_by_priority: PriorityBreakdown,
    pub tasks_by_tag: BTreeMap<String, u64>,
    pub monthly_trends: Vec<MonthlyTrend>,
    pub upcoming_deadlines: Vec<UpcomingDeadline>,
}

/// 優先度ごとの件数。3 つのキーは常に揃っている
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl PriorityBreakdown {
    pub fn increment(&mut self, priority: TaskPriority) {
        match priority {
            TaskPriority::High => self.high += 1,
            TaskPriority::Medium => self.medium += 1,
            TaskPriority::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.high + self.medium + self.low
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// `YYYY-MM`
    pub month: String,
    pub created: u64,
    pub completed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDeadline {
    pub task_id: Uuid,
    pub title: String,
    /// 保存されている文字列をそのまま返す
    pub due_date: String,
    pub priority: TaskPriority,
}
