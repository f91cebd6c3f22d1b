// tests/integration/analytics/mod.rs
pub mod auth_tests;
pub mod fallback_tests;
pub mod report_tests;
