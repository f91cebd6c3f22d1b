// task-analytics/src/domain/task_priority.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// タスクの優先度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// 集計用の実効優先度。
    ///
    /// 値が無い、または `low` / `medium` / `high` 以外の場合は `medium` とみなす。
    /// 保存値は書き換えず、読み取り時にだけ適用する。
    pub fn effective(raw: Option<&str>) -> Self {
        raw.and_then(Self::from_str).unwrap_or_default()
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| {
            format!(
                "Invalid task priority: '{}'. Valid priorities are: low, medium, high",
                s
            )
        })
    }
}
