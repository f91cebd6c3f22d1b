// task-analytics/src/service/analytics_cache.rs
//
// ユーザーごとの分析レポートの短期キャッシュ

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::api::dto::analytics_dto::AnalyticsReport;
use crate::log_with_context;

#[derive(Clone, Debug)]
struct CachedReport {
    report: AnalyticsReport,
    cached_at: Instant,
}

/// 集計を始めた時点の無効化世代。
///
/// 集計中にいずれかのユーザーで `invalidate` が走った場合、その結果は保存しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTicket(u64);

/// TTL 付きのレポートキャッシュ。TTL が 0 の場合は何も保持しない
#[derive(Clone)]
pub struct AnalyticsCache {
    entries: Arc<RwLock<HashMap<Uuid, CachedReport>>>,
    // invalidate のたびに進む。書き込みロック内でのみ更新する
    generation: Arc<AtomicU64>,
    ttl: Duration,
    max_entries: usize,
}

impl AnalyticsCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
            ttl,
            max_entries,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub async fn get(&self, user_id: Uuid) -> Option<AnalyticsReport> {
        self.get_at(user_id, Instant::now()).await
    }

    pub async fn get_at(&self, user_id: Uuid, now: Instant) -> Option<AnalyticsReport> {
        if !self.is_enabled() {
            return None;
        }

        let entries = self.entries.read().await;
        let entry = entries.get(&user_id)?;
        let age = now.saturating_duration_since(entry.cached_at);
        if age < self.ttl {
            log_with_context!(
                tracing::Level::DEBUG,
                "Analytics cache hit",
                user_id => user_id,
                cache_age_ms => age.as_millis()
            );
            Some(entry.report.clone())
        } else {
            None
        }
    }

    /// 集計を始める前に取得する
    pub fn ticket(&self) -> CacheTicket {
        CacheTicket(self.generation.load(Ordering::Acquire))
    }

    pub async fn insert(&self, user_id: Uuid, ticket: CacheTicket, report: AnalyticsReport) {
        self.insert_at(user_id, ticket, report, Instant::now()).await;
    }

    pub async fn insert_at(
        &self,
        user_id: Uuid,
        ticket: CacheTicket,
        report: AnalyticsReport,
        now: Instant,
    ) {
        if !self.is_enabled() {
            return;
        }

        let mut entries = self.entries.write().await;
        if self.generation.load(Ordering::Acquire) != ticket.0 {
            log_with_context!(
                tracing::Level::DEBUG,
                "Analytics cache invalidated during computation, skipping insert",
                user_id => user_id
            );
            return;
        }
        if entries.len() >= self.max_entries && !entries.contains_key(&user_id) {
            let ttl = self.ttl;
            entries.retain(|_, entry| now.saturating_duration_since(entry.cached_at) < ttl);
            // 期限内のエントリで埋まっている場合は保存しない
            if entries.len() >= self.max_entries {
                return;
            }
        }
        entries.insert(
            user_id,
            CachedReport {
                report,
                cached_at: now,
            },
        );
    }

    /// タスクが変更されたユーザーのレポートを破棄する
    pub async fn invalidate(&self, user_id: Uuid) {
        if !self.is_enabled() {
            return;
        }
        let mut entries = self.entries.write().await;
        entries.remove(&user_id);
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
