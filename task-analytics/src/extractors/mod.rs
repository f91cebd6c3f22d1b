// task-analytics/src/extractors/mod.rs
pub mod uuid;
