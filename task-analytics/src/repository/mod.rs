// task-analytics/src/repository/mod.rs
pub mod analytics_repository;
pub mod task_repository;
