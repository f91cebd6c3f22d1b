// task-analytics/src/api/mod.rs
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::logging::{inject_request_context, logging_middleware};
use crate::middleware::auth::{jwt_auth_middleware, AuthMiddlewareConfig};
use crate::middleware::rate_limit::{rate_limit_middleware, SlidingWindowLimiter};
use crate::service::analytics_cache::AnalyticsCache;
use crate::service::{analytics_service::AnalyticsService, task_service::TaskService};
use crate::utils::jwt::{JwtError, JwtManager};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use std::sync::Arc;

pub mod dto;
pub mod handlers;

use handlers::{
    analytics_handler::analytics_router, system_handler::system_router,
    task_handler::task_router,
};

/// 統一されたアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub task_service: Arc<TaskService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub jwt_manager: Arc<JwtManager>,
    pub rate_limiter: SlidingWindowLimiter,
}

impl AppState {
    /// データベース接続から本番用のサービス群を組み立てる
    pub fn new(config: AppConfig, db_pool: DbPool) -> Result<Self, JwtError> {
        let cache = AnalyticsCache::new(
            config.analytics.cache_ttl,
            config.analytics.cache_max_entries,
        );
        let task_service = TaskService::new(db_pool.clone(), cache.clone());
        let analytics_service =
            AnalyticsService::with_database(db_pool, cache, &config.analytics);

        Self::from_parts(config, task_service, analytics_service)
    }

    pub fn from_parts(
        config: AppConfig,
        task_service: TaskService,
        analytics_service: AnalyticsService,
    ) -> Result<Self, JwtError> {
        let jwt_manager = JwtManager::new(config.jwt.clone())?;
        let rate_limiter = SlidingWindowLimiter::new(config.rate_limit.clone());

        Ok(Self {
            config: Arc::new(config),
            task_service: Arc::new(task_service),
            analytics_service: Arc::new(analytics_service),
            jwt_manager: Arc::new(jwt_manager),
            rate_limiter,
        })
    }
}

/// ルーター全体。
///
/// 分析エンドポイントはリクエストコンテキスト → 認証 → レート制限 → ハンドラ の順に通る。
pub fn create_router(app_state: AppState) -> Router {
    let auth_config = AuthMiddlewareConfig::new(app_state.jwt_manager.clone());

    // route_layer は後から追加したものが外側になる
    let analytics = analytics_router().route_layer(from_fn_with_state(
        app_state.rate_limiter.clone(),
        rate_limit_middleware,
    ));

    let protected = Router::new()
        .merge(analytics)
        .merge(task_router())
        .route_layer(from_fn_with_state(auth_config, jwt_auth_middleware));

    Router::new()
        .merge(system_router())
        .merge(protected)
        .layer(from_fn(logging_middleware))
        .layer(from_fn(inject_request_context))
        .with_state(app_state)
}
