//! Benchmark orchestration.
//!
//! A run has four stages: generate the test files, probe memory bandwidth,
//! copy the files to the destination with direct I/O, and aggregate the two
//! timed passes into a report. Each timed stage runs all files in parallel
//! through [`runner::run_all`].

use crate::bench::runner;
use crate::bench::task::CopyTask;
use crate::config::{BenchmarkConfig, CopyStrategy};
use crate::models::{AggregateStats, BenchmarkRecord, BenchmarkReport};
use crate::{ParcpError, Result, TEST_FILE_PREFIX};
use chrono::Utc;
use tracing::info;

/// Name of the `i`-th test file, 1-based.
pub fn test_file_name(i: usize) -> String {
    format!("{}{}", TEST_FILE_PREFIX, i)
}

pub struct BenchmarkRunner {
    config: BenchmarkConfig,
}

impl BenchmarkRunner {
    pub fn new(config: BenchmarkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run the full benchmark and return the aggregated report.
    ///
    /// A failed generation aborts the run; failures in the timed passes are
    /// recorded per file and the run completes with `all_succeeded` unset.
    pub async fn run(&self) -> Result<BenchmarkReport> {
        let config = &self.config;

        info!(
            files = config.num_files,
            size = config.file_size,
            "generating test files"
        );
        let generated = runner::run_all(self.generate_tasks()).await?;
        if let Some(failed) = generated.iter().find(|task| task.status.is_failure()) {
            return Err(ParcpError::WorkerError(format!(
                "test file generation failed for {}: {}",
                failed.file_name(),
                failed.status
            )));
        }

        info!("probing memory bandwidth");
        let probed = runner::run_all(self.copy_tasks(CopyStrategy::MemoryImpact, "")).await?;

        info!("copying to disk with direct I/O");
        let copied = runner::run_all(self.copy_tasks(CopyStrategy::DirectIo, "_disk")).await?;

        let records = probed
            .iter()
            .zip(copied.iter())
            .map(|(memory, disk)| BenchmarkRecord {
                index: memory.index,
                filename: memory.file_name(),
                size_mib: memory.size_mib(),
                memory_duration_secs: memory.duration.as_secs_f64(),
                memory_speed_mibps: memory.speed_mibps,
                disk_duration_secs: disk.duration.as_secs_f64(),
                disk_speed_mibps: disk.speed_mibps,
            })
            .collect();

        let all_succeeded = probed
            .iter()
            .chain(copied.iter())
            .all(|task| !task.status.is_failure());

        Ok(BenchmarkReport {
            timestamp: Utc::now(),
            records,
            memory: AggregateStats::from_tasks(&probed),
            disk: AggregateStats::from_tasks(&copied),
            all_succeeded,
        })
    }

    fn generate_tasks(&self) -> Vec<CopyTask> {
        (1..=self.config.num_files)
            .map(|i| {
                CopyTask::generate(
                    i - 1,
                    self.config.source_dir.join(test_file_name(i)),
                    self.config.file_size,
                )
            })
            .collect()
    }

    fn copy_tasks(&self, strategy: CopyStrategy, dest_suffix: &str) -> Vec<CopyTask> {
        (1..=self.config.num_files)
            .map(|i| {
                CopyTask::copy(
                    i - 1,
                    self.config.source_dir.join(test_file_name(i)),
                    self.config
                        .dest_dir
                        .join(format!("{}{}", test_file_name(i), dest_suffix)),
                    strategy,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_names_are_one_based() {
        assert_eq!(test_file_name(1), "test_file_1");
        assert_eq!(test_file_name(12), "test_file_12");
    }

    #[tokio::test]
    async fn test_full_run_produces_report_and_disk_copies() {
        let source = tempdir().unwrap();
        let dest = tempdir().unwrap();

        let config = BenchmarkConfig::new(
            source.path().to_path_buf(),
            dest.path().to_path_buf(),
            64 * 1024,
            3,
        );
        let report = BenchmarkRunner::new(config).unwrap().run().await.unwrap();

        assert!(report.all_succeeded);
        assert_eq!(report.records.len(), 3);
        for i in 1..=3 {
            assert!(source.path().join(test_file_name(i)).exists());
            assert!(dest
                .path()
                .join(format!("{}_disk", test_file_name(i)))
                .exists());
        }
        assert_eq!(report.memory.total_size_mib, report.disk.total_size_mib);
    }

    #[tokio::test]
    async fn test_generation_failure_aborts_run() {
        let source = tempdir().unwrap();
        let dest = tempdir().unwrap();

        let config = BenchmarkConfig::new(
            source.path().to_path_buf(),
            dest.path().to_path_buf(),
            64 * 1024,
            1,
        );
        let runner = BenchmarkRunner::new(config).unwrap();

        // Pull the source directory out from under the run
        std::fs::remove_dir_all(source.path()).unwrap();

        assert!(runner.run().await.is_err());
    }
}
