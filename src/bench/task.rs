//! A single unit of timed work.

use crate::config::CopyStrategy;
use crate::util::units;
use crate::{testfile, Result};
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::warn;

/// What a task does when executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    /// Copy `source` to `destination` with the given strategy.
    Copy(CopyStrategy),
    /// Generate a test file of `size` bytes at `destination`.
    Generate { size: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Completed,
    Failed(String),
}

impl TaskStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, TaskStatus::Failed(_))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => f.write_str("pending"),
            TaskStatus::Completed => f.write_str("completed"),
            TaskStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// One file's worth of work plus its measurements after execution.
#[derive(Debug, Clone)]
pub struct CopyTask {
    pub index: usize,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub kind: TaskKind,
    /// Bytes the task moved (or was asked to create). Filled in during
    /// execution for copy tasks, from source metadata.
    pub size_bytes: u64,
    pub duration: Duration,
    pub speed_mibps: f64,
    pub status: TaskStatus,
}

impl CopyTask {
    pub fn copy(index: usize, source: PathBuf, destination: PathBuf, strategy: CopyStrategy) -> Self {
        Self {
            index,
            source,
            destination,
            kind: TaskKind::Copy(strategy),
            size_bytes: 0,
            duration: Duration::ZERO,
            speed_mibps: 0.0,
            status: TaskStatus::Pending,
        }
    }

    pub fn generate(index: usize, destination: PathBuf, size: u64) -> Self {
        Self {
            index,
            source: destination.clone(),
            destination,
            kind: TaskKind::Generate { size },
            size_bytes: 0,
            duration: Duration::ZERO,
            speed_mibps: 0.0,
            status: TaskStatus::Pending,
        }
    }

    pub fn size_mib(&self) -> f64 {
        units::bytes_to_mib(self.size_bytes)
    }

    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

/// Run the task's work, timing it and recording the outcome in place.
///
/// Failure lands in `task.status` rather than propagating; one broken file
/// must not take down the tasks running beside it.
pub fn execute(task: &mut CopyTask) {
    let start = Instant::now();
    let outcome = run_kind(task);
    task.duration = start.elapsed();
    task.speed_mibps = units::speed_mib_per_sec(task.size_bytes, task.duration);

    task.status = match outcome {
        Ok(()) => TaskStatus::Completed,
        Err(e) => {
            warn!(index = task.index, file = %task.file_name(), error = %e, "task failed");
            TaskStatus::Failed(e.to_string())
        }
    };
}

fn run_kind(task: &mut CopyTask) -> Result<()> {
    match task.kind.clone() {
        TaskKind::Generate { size } => {
            task.size_bytes = size;
            testfile::generate_test_file(&task.destination, size)
        }
        TaskKind::Copy(strategy) => {
            let size = std::fs::metadata(&task.source)?.len();
            task.size_bytes = size;
            strategy.copy(&task.source, &task.destination, size)
        }
    }
}
