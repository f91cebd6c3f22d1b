// task-analytics/src/service/analytics/deadlines.rs

use crate::api::dto::analytics_dto::UpcomingDeadline;
use crate::service::analytics::snapshot::TaskSnapshot;
use crate::service::analytics::window::ReportWindow;

/// 未完了かつ `[now, now + window]` に期限があるタスクを期限の昇順で最大 `limit` 件。
/// 期限を解釈できないタスクは対象外
pub fn upcoming_deadlines(
    tasks: &[TaskSnapshot],
    window: &ReportWindow,
    limit: usize,
) -> Vec<UpcomingDeadline> {
    let mut candidates: Vec<&TaskSnapshot> = tasks
        .iter()
        .filter(|task| !task.is_done())
        .filter(|task| task.due_at.is_some_and(|due| window.is_upcoming(due)))
        .collect();

    // 同じ期限は id 順にして結果を決定的にする
    candidates.sort_by(|a, b| a.due_at.cmp(&b.due_at).then_with(|| a.id.cmp(&b.id)));
    candidates.truncate(limit);

    candidates
        .into_iter()
        .filter_map(|task| {
            task.due_date.as_ref().map(|due_date| UpcomingDeadline {
                task_id: task.id,
                title: task.title.clone(),
                due_date: due_date.clone(),
                priority: task.priority,
            })
        })
        .collect()
}
