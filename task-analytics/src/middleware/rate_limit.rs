// task-analytics/src/middleware/rate_limit.rs

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;
use tracing::warn;

use crate::{config::RateLimitConfig, error::AppError, middleware::auth::AuthenticatedUser};

/// 1回のチェック結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: usize },
    Limited { retry_after: Duration },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed { .. })
    }
}

/// スライディングウィンドウ方式のレート制限。
///
/// 識別子ごとに受け付けた時刻を古い順に保持し、チェックのたびに窓の外を捨てる。
#[derive(Clone)]
pub struct SlidingWindowLimiter {
    windows: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    config: RateLimitConfig,
}

impl SlidingWindowLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }

    pub async fn check(&self, identity: &str) -> RateLimitDecision {
        self.check_at(identity, Instant::now()).await
    }

    pub async fn check_at(&self, identity: &str, now: Instant) -> RateLimitDecision {
        let window = self.config.window;
        let mut windows = self.windows.lock().await;

        if windows.len() >= self.config.max_tracked && !windows.contains_key(identity) {
            // 窓が空になった識別子を掃除する
            windows.retain(|_, timestamps| {
                prune(timestamps, now, window);
                !timestamps.is_empty()
            });
        }

        let timestamps = windows.entry(identity.to_string()).or_default();
        prune(timestamps, now, window);

        if timestamps.len() >= self.config.max_requests {
            let retry_after = timestamps
                .front()
                .map_or(window, |oldest| {
                    window.saturating_sub(now.saturating_duration_since(*oldest))
                })
                .max(Duration::from_secs(1));
            return RateLimitDecision::Limited { retry_after };
        }

        timestamps.push_back(now);
        RateLimitDecision::Allowed {
            remaining: self.config.max_requests - timestamps.len(),
        }
    }

    pub async fn tracked_identities(&self) -> usize {
        self.windows.lock().await.len()
    }
}

fn prune(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = timestamps.front() {
        if now.saturating_duration_since(*oldest) >= window {
            timestamps.pop_front();
        } else {
            break;
        }
    }
}

/// 秒単位に切り上げる
fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs();
    if retry_after.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

/// 認証済みユーザー単位のレート制限ミドルウェア。認証ミドルウェアの後に置く
pub async fn rate_limit_middleware(
    State(limiter): State<SlidingWindowLimiter>,
    user: AuthenticatedUser,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let identity = user.user_id().to_string();

    match limiter.check(&identity).await {
        RateLimitDecision::Allowed { .. } => Ok(next.run(request).await),
        RateLimitDecision::Limited { retry_after } => {
            let retry_after_secs = retry_after_secs(retry_after);
            warn!(
                user_id = %identity,
                path = %request.uri().path(),
                retry_after_secs = retry_after_secs,
                "Rate limit exceeded"
            );
            Err(AppError::TooManyRequests {
                message: "Rate limit exceeded. Please try again later.".to_string(),
                retry_after_secs,
            })
        }
    }
}
