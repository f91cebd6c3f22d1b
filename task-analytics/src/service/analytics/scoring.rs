// task-analytics/src/service/analytics/scoring.rs

use crate::domain::task_status::TaskStatus;
use crate::service::analytics::snapshot::TaskSnapshot;
use crate::service::analytics::window::ReportWindow;

// 生産性スコアの重みと飽和点。出力互換のため値を変えないこと
const COMPLETION_WEIGHT: f64 = 0.4;
const OVERDUE_WEIGHT: f64 = 0.3;
const VOLUME_WEIGHT: f64 = 0.2;
const ACTIVITY_WEIGHT: f64 = 0.1;
const VOLUME_POINTS_PER_TASK: f64 = 10.0;
const ACTIVITY_POINTS_PER_TASK: f64 = 25.0;

/// スカラー件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub overdue: u64,
}

impl TaskCounts {
    pub fn from_tasks(tasks: &[TaskSnapshot], window: &ReportWindow) -> Self {
        tasks.iter().fold(Self::default(), |mut counts, task| {
            counts.total += 1;
            match task.status {
                Some(TaskStatus::Done) => counts.completed += 1,
                Some(TaskStatus::Pending) => counts.pending += 1,
                Some(TaskStatus::InProgress) => counts.in_progress += 1,
                None => {}
            }
            if !task.is_done() && task.due_at.is_some_and(|due| window.is_overdue(due)) {
                counts.overdue += 1;
            }
            counts
        })
    }

    /// 完了率（%）。タスクが無ければ 0
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed as f64 * 100.0) / self.total as f64
    }

    /// 0〜100 の生産性スコア。
    ///
    /// 完了率 40%、期限超過の少なさ 30%、件数 20%（10件で飽和）、
    /// 進行中件数 10%（4件で飽和）の加重和を四捨五入する。
    pub fn productivity_score(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let total = self.total as f64;

        let completion = self.completion_rate() * COMPLETION_WEIGHT;
        let overdue = (100.0 - (self.overdue as f64 / total) * 100.0).max(0.0) * OVERDUE_WEIGHT;
        let volume = (total * VOLUME_POINTS_PER_TASK).min(100.0) * VOLUME_WEIGHT;
        let activity =
            (self.in_progress as f64 * ACTIVITY_POINTS_PER_TASK).min(100.0) * ACTIVITY_WEIGHT;

        (completion + overdue + volume + activity)
            .round()
            .clamp(0.0, 100.0) as u8
    }
}
