//! Task definition, parallel execution, and benchmark orchestration.

pub mod benchmark;
pub mod runner;
pub mod task;

pub use benchmark::{test_file_name, BenchmarkRunner};
pub use task::{execute, CopyTask, TaskKind, TaskStatus};
