// task-analytics/src/api/handlers/mod.rs
pub mod analytics_handler;
pub mod system_handler;
pub mod task_handler;
