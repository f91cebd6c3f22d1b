// task-analytics/src/service/analytics/trends.rs

use chrono::{DateTime, Datelike, Utc};
use std::collections::HashMap;

use crate::api::dto::analytics_dto::MonthlyTrend;
use crate::service::analytics::snapshot::TaskSnapshot;

/// 当月を含めて遡る月数
pub const TREND_MONTHS: usize = 6;

/// UTC 基準の暦月
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn of(instant: DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
        }
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// `YYYY-MM`
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// `now` の月で終わる連続した 6 か月（昇順）
pub fn trend_months(now: DateTime<Utc>) -> Vec<YearMonth> {
    let mut months = Vec::with_capacity(TREND_MONTHS);
    let mut current = YearMonth::of(now);
    for _ in 0..TREND_MONTHS {
        months.push(current);
        current = current.previous();
    }
    months.reverse();
    months
}

/// 作成月ごとの作成数と完了数。
///
/// 完了日時は保存していないため、完了は作成月に計上する。
/// 期間外に作成されたタスクはここでは数えない。
pub fn monthly_trends(tasks: &[TaskSnapshot], now: DateTime<Utc>) -> Vec<MonthlyTrend> {
    let months = trend_months(now);
    let mut buckets: HashMap<YearMonth, (u64, u64)> =
        months.iter().map(|month| (*month, (0, 0))).collect();

    for task in tasks {
        if let Some((created, completed)) = buckets.get_mut(&YearMonth::of(task.created_at)) {
            *created += 1;
            if task.is_done() {
                *completed += 1;
            }
        }
    }

    months
        .into_iter()
        .map(|month| {
            let (created, completed) = buckets.get(&month).copied().unwrap_or_default();
            MonthlyTrend {
                month: month.key(),
                created,
                completed,
            }
        })
        .collect()
}

/// 集計済みの月次行を 6 か月の枠に当てはめる。枠外のキーは捨て、欠けた月は 0 で埋める
pub fn fill_trend_months(
    now: DateTime<Utc>,
    rows: impl IntoIterator<Item = MonthlyTrend>,
) -> Vec<MonthlyTrend> {
    let by_key: HashMap<String, MonthlyTrend> =
        rows.into_iter().map(|row| (row.month.clone(), row)).collect();

    trend_months(now)
        .into_iter()
        .map(|month| {
            let key = month.key();
            by_key.get(&key).cloned().unwrap_or(MonthlyTrend {
                month: key,
                created: 0,
                completed: 0,
            })
        })
        .collect()
}
