// task-analytics/src/service/analytics/mod.rs

//! ユーザー単位の分析レポートを計算する純粋な集計ロジック。
//!
//! データストアには触れない。一括集計戦略とサンプル戦略の両方がここを通り、
//! 完了率とスコアの計算式を共有する。

pub mod deadlines;
pub mod distribution;
pub mod report;
pub mod scoring;
pub mod snapshot;
pub mod trends;
pub mod window;

pub use report::{aggregate_tasks, assemble_report, report_from_sample, ReportOptions};
pub use scoring::TaskCounts;
pub use snapshot::TaskSnapshot;
pub use window::ReportWindow;
