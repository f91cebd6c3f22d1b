// task-analytics/src/api/dto/mod.rs
pub mod analytics_dto;
pub mod task_dto;
