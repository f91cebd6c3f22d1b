// task-analytics/src/domain/task_metadata.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::domain::task_priority::TaskPriority;

/// `metadata` JSONB 列の読み取りビュー。
///
/// 保存されているのは自由形式の JSON なので、型が合わない値は黙って無視する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskMetadata {
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub tags: Vec<String>,
}

impl TaskMetadata {
    pub fn from_json(value: Option<&Value>) -> Self {
        let Some(object) = value.and_then(Value::as_object) else {
            return Self::default();
        };

        let priority = object
            .get("priority")
            .and_then(Value::as_str)
            .map(str::to_string);

        let due_date = object
            .get("dueDate")
            .and_then(Value::as_str)
            .map(str::to_string);

        // 配列以外の tags、および文字列以外の要素は数えない
        let tags = object
            .get("tags")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            priority,
            due_date,
            tags,
        }
    }

    pub fn effective_priority(&self) -> TaskPriority {
        TaskPriority::effective(self.priority.as_deref())
    }

    /// 期限日時。解釈できない値は `None`。
    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        self.due_date.as_deref().and_then(parse_due_date)
    }
}

/// 期限文字列を UTC 日時として解釈する。
///
/// 受け付ける形式: RFC 3339、タイムゾーン無しの `YYYY-MM-DDTHH:MM:SS[.fff]`
/// （UTC とみなす）、`YYYY-MM-DD`（UTC の 0 時）。
/// 前後に空白を含む値は、SQL 側の `safe_timestamptz` と同じく解釈しない。
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() || raw.trim() != raw {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
