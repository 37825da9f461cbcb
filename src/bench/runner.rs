//! Parallel task execution.
//!
//! Every task gets its own blocking thread and all of them start before any
//! is awaited, so N files copy with N-way parallelism. Fan-out is unbounded:
//! the task count is the file count the user asked for, and the OS thread
//! and memory ceilings are the effective limits.

use crate::bench::task::{self, CopyTask};
use crate::{ParcpError, Result};
use tracing::info;

/// Execute all tasks concurrently and return them with their measurements
/// filled in, in the original order.
///
/// A task failure is recorded in its status; only a panicked or cancelled
/// worker thread turns into an error here.
pub async fn run_all(tasks: Vec<CopyTask>) -> Result<Vec<CopyTask>> {
    info!(tasks = tasks.len(), "starting parallel execution");

    let handles: Vec<_> = tasks
        .into_iter()
        .map(|mut task| {
            tokio::task::spawn_blocking(move || {
                task::execute(&mut task);
                task
            })
        })
        .collect();

    let mut finished = Vec::with_capacity(handles.len());
    for handle in handles {
        let task = handle
            .await
            .map_err(|e| ParcpError::WorkerError(format!("worker thread failed: {}", e)))?;
        finished.push(task);
    }

    Ok(finished)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::task::TaskStatus;
    use crate::config::CopyStrategy;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_runs_all_tasks_and_keeps_order() {
        let dir = tempdir().unwrap();
        let tasks: Vec<CopyTask> = (0..4)
            .map(|i| {
                CopyTask::generate(i, dir.path().join(format!("gen_{}.dat", i)), 32 * 1024)
            })
            .collect();

        let finished = run_all(tasks).await.unwrap();

        assert_eq!(finished.len(), 4);
        for (i, task) in finished.iter().enumerate() {
            assert_eq!(task.index, i);
            assert_eq!(task.status, TaskStatus::Completed);
        }
    }

    #[tokio::test]
    async fn test_one_failure_does_not_stop_the_rest() {
        let dir = tempdir().unwrap();
        let good_src = dir.path().join("good.dat");
        std::fs::write(&good_src, vec![1u8; 2048]).unwrap();

        let tasks = vec![
            CopyTask::copy(
                0,
                dir.path().join("missing.dat"),
                dir.path().join("bad_copy.dat"),
                CopyStrategy::SystemCp,
            ),
            CopyTask::copy(
                1,
                good_src,
                dir.path().join("good_copy.dat"),
                CopyStrategy::SystemCp,
            ),
        ];

        let finished = run_all(tasks).await.unwrap();

        assert!(finished[0].status.is_failure());
        assert_eq!(finished[1].status, TaskStatus::Completed);
        assert!(dir.path().join("good_copy.dat").exists());
    }

    #[tokio::test]
    async fn test_empty_task_list() {
        let finished = run_all(Vec::new()).await.unwrap();
        assert!(finished.is_empty());
    }
}
