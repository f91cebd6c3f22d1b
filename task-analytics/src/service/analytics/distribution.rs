// task-analytics/src/service/analytics/distribution.rs

use std::collections::{BTreeMap, HashMap};

use crate::api::dto::analytics_dto::PriorityBreakdown;
use crate::service::analytics::snapshot::TaskSnapshot;

pub fn priority_breakdown(tasks: &[TaskSnapshot]) -> PriorityBreakdown {
    tasks
        .iter()
        .fold(PriorityBreakdown::default(), |mut breakdown, task| {
            breakdown.increment(task.priority);
            breakdown
        })
}

/// タグの出現回数。大文字小文字は区別し、同じタスク内の重複も出現ごとに数える
pub fn count_tags(tasks: &[TaskSnapshot]) -> HashMap<String, u64> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for tag in tasks.iter().flat_map(|task| task.tags.iter()) {
        *counts.entry(tag.clone()).or_insert(0) += 1;
    }
    counts
}

/// 件数の多い順（同数ならタグ文字列の昇順）に `limit` 件だけ残す
pub fn top_tags(
    counts: impl IntoIterator<Item = (String, u64)>,
    limit: usize,
) -> BTreeMap<String, u64> {
    let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
    ranked.sort_by(|(tag_a, count_a), (tag_b, count_b)| {
        count_b.cmp(count_a).then_with(|| tag_a.cmp(tag_b))
    });
    ranked.truncate(limit);
    ranked.into_iter().collect()
}
