// task-analytics/src/service/analytics/window.rs

use chrono::{DateTime, Duration, Utc};

/// 1回のレポート生成で使う基準時刻。
///
/// 境界層で一度だけ計算して集計側へ渡す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub now: DateTime<Utc>,
    /// 期限間近とみなす上限（両端を含む）
    pub deadline_until: DateTime<Utc>,
}

impl ReportWindow {
    pub fn new(now: DateTime<Utc>, deadline_window_days: i64) -> Self {
        Self {
            now,
            deadline_until: now + Duration::days(deadline_window_days),
        }
    }

    pub fn is_overdue(&self, due_at: DateTime<Utc>) -> bool {
        due_at < self.now
    }

    pub fn is_upcoming(&self, due_at: DateTime<Utc>) -> bool {
        self.now <= due_at && due_at <= self.deadline_until
    }
}
