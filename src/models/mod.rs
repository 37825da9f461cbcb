//! Result models: per-file records, aggregate statistics, and the report.

pub mod result;

pub use result::{render_task_table, AggregateStats, BenchmarkRecord, BenchmarkReport};
