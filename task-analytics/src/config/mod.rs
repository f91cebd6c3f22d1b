// task-analytics/src/config/mod.rs
pub mod app;

pub use app::{AnalyticsConfig, AppConfig, RateLimitConfig};
