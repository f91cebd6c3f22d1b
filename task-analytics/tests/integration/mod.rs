// tests/integration/mod.rs

pub mod analytics;
