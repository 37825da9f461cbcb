//! Benchmark result types and report rendering.

use crate::bench::task::CopyTask;
use crate::{Result, BANDWIDTH_WALL_RATIO};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

/// One test file's measurements across the memory and disk passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub index: usize,
    pub filename: String,
    pub size_mib: f64,
    pub memory_duration_secs: f64,
    pub memory_speed_mibps: f64,
    pub disk_duration_secs: f64,
    pub disk_speed_mibps: f64,
}

/// Aggregate view of one parallel pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_size_mib: f64,
    /// Wall-clock duration of the pass: the slowest task, since all tasks
    /// run concurrently.
    pub total_duration_secs: f64,
    /// Total size over wall-clock duration, not a mean of per-task speeds.
    pub average_speed_mibps: f64,
}

impl AggregateStats {
    pub fn from_pairs(pairs: &[(f64, Duration)]) -> Self {
        let total_size_mib: f64 = pairs.iter().map(|(size, _)| size).sum();
        let total_duration_secs = pairs
            .iter()
            .map(|(_, duration)| duration.as_secs_f64())
            .fold(0.0, f64::max);
        Self {
            total_size_mib,
            total_duration_secs,
            average_speed_mibps: total_size_mib / total_duration_secs,
        }
    }

    pub fn from_tasks(tasks: &[CopyTask]) -> Self {
        let pairs: Vec<(f64, Duration)> = tasks
            .iter()
            .map(|task| (task.size_mib(), task.duration))
            .collect();
        Self::from_pairs(&pairs)
    }
}

/// Full benchmark outcome, persistable as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub timestamp: DateTime<Utc>,
    pub records: Vec<BenchmarkRecord>,
    pub memory: AggregateStats,
    pub disk: AggregateStats,
    pub all_succeeded: bool,
}

impl BenchmarkReport {
    /// Disk throughput as a fraction of memory throughput.
    pub fn speed_ratio(&self) -> f64 {
        self.disk.average_speed_mibps / self.memory.average_speed_mibps
    }

    /// Whether disk throughput is close enough to memory throughput that the
    /// disk pass is likely limited by memory bandwidth rather than the disk.
    pub fn memory_bandwidth_wall(&self) -> bool {
        self.speed_ratio() >= BANDWIDTH_WALL_RATIO
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Render the report as the human-readable table printed after a run.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Benchmark results ({})", self.timestamp.to_rfc3339());
        let _ = writeln!(
            out,
            "{:<5} {:<20} {:>12} {:>12} {:>14} {:>12} {:>14}",
            "Idx", "File", "Size (MiB)", "Mem (s)", "Mem (MiB/s)", "Disk (s)", "Disk (MiB/s)"
        );
        for record in &self.records {
            let _ = writeln!(
                out,
                "{:<5} {:<20} {:>12.2} {:>12.3} {:>14.2} {:>12.3} {:>14.2}",
                record.index,
                record.filename,
                record.size_mib,
                record.memory_duration_secs,
                record.memory_speed_mibps,
                record.disk_duration_secs,
                record.disk_speed_mibps,
            );
        }
        let _ = writeln!(
            out,
            "Memory: {:.2} MiB in {:.3} s ({:.2} MiB/s)",
            self.memory.total_size_mib,
            self.memory.total_duration_secs,
            self.memory.average_speed_mibps,
        );
        let _ = writeln!(
            out,
            "Disk:   {:.2} MiB in {:.3} s ({:.2} MiB/s)",
            self.disk.total_size_mib, self.disk.total_duration_secs, self.disk.average_speed_mibps,
        );
        let _ = writeln!(out, "Disk/memory speed ratio: {:.2}", self.speed_ratio());
        if self.memory_bandwidth_wall() {
            let _ = writeln!(out, "You may hit the memory bandwidth wall");
        }
        if !self.all_succeeded {
            let _ = writeln!(out, "Warning: one or more tasks failed");
        }
        out
    }
}

/// Render a per-task table for the copy and generate modes.
pub fn render_task_table(tasks: &[CopyTask]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<20} {:>12} {:>12} {:>14}",
        "Idx", "File", "Size (MiB)", "Time (s)", "Speed (MiB/s)"
    );
    for task in tasks {
        let _ = write!(
            out,
            "{:<5} {:<20} {:>12.2} {:>12.3} {:>14.2}",
            task.index,
            task.file_name(),
            task.size_mib(),
            task.duration.as_secs_f64(),
            task.speed_mibps,
        );
        if task.status.is_failure() {
            let _ = write!(out, "  [{}]", task.status);
        }
        let _ = writeln!(out);
    }

    let stats = AggregateStats::from_tasks(tasks);
    let _ = writeln!(
        out,
        "Total: {:.2} MiB in {:.3} s ({:.2} MiB/s)",
        stats.total_size_mib, stats.total_duration_secs, stats.average_speed_mibps,
    );
    out
}
