// task-analytics/src/service/mod.rs
pub mod analytics;
pub mod analytics_cache;
pub mod analytics_service;
pub mod analytics_strategy;
pub mod task_service;
