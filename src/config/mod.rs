//! Run configuration for the copy, generate, and benchmark modes.
//!
//! Each mode carries its own config struct with a `validate()` that rejects
//! impossible runs up front, before any file is touched.

use crate::{ParcpError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How a file's bytes travel from source to destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyStrategy {
    /// Delegate to the operating system's buffered copy path.
    SystemCp,
    /// Map source and destination and copy through page-cache-backed memory.
    Mmap,
    /// Unbuffered block-aligned reads and writes through an aligned buffer.
    DirectIo,
    /// Memory-to-memory probe that touches no disk; measures the bandwidth
    /// ceiling the direct path competes against.
    MemoryImpact,
}

impl CopyStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyStrategy::SystemCp => "cp",
            CopyStrategy::Mmap => "mmap",
            CopyStrategy::DirectIo => "direct_io",
            CopyStrategy::MemoryImpact => "direct_io_memory_impact",
        }
    }
}

impl FromStr for CopyStrategy {
    type Err = ParcpError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cp" => Ok(CopyStrategy::SystemCp),
            "mmap" => Ok(CopyStrategy::Mmap),
            "direct_io" => Ok(CopyStrategy::DirectIo),
            "direct_io_memory_impact" => Ok(CopyStrategy::MemoryImpact),
            other => Err(ParcpError::ParseError(format!(
                "unknown copy mode: {} (expected cp, mmap, direct_io, or direct_io_memory_impact)",
                other
            ))),
        }
    }
}

impl fmt::Display for CopyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a plain parallel copy run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyConfig {
    /// Files to copy, one task per file.
    pub sources: Vec<PathBuf>,
    /// Directory the copies land in, keyed by source file name.
    pub dest_dir: PathBuf,
    pub strategy: CopyStrategy,
}

impl CopyConfig {
    pub fn new(sources: Vec<PathBuf>, dest_dir: PathBuf, strategy: CopyStrategy) -> Self {
        Self {
            sources,
            dest_dir,
            strategy,
        }
    }

    pub fn with_strategy(mut self, strategy: CopyStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(ParcpError::ConfigError(
                "at least one source file is required".to_string(),
            ));
        }
        for source in &self.sources {
            if source.file_name().is_none() {
                return Err(ParcpError::ConfigError(format!(
                    "source path has no file name: {}",
                    source.display()
                )));
            }
        }
        if !self.dest_dir.is_dir() {
            return Err(ParcpError::ConfigError(format!(
                "destination directory does not exist: {}",
                self.dest_dir.display()
            )));
        }
        Ok(())
    }
}

/// Configuration for test-file generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Directory the generated files are written into.
    pub dir: PathBuf,
    /// Size of each file in bytes.
    pub file_size: u64,
    pub num_files: usize,
}

impl GenerateConfig {
    pub fn new(dir: PathBuf, file_size: u64, num_files: usize) -> Self {
        Self {
            dir,
            file_size,
            num_files,
        }
    }

    pub fn with_file_size(mut self, file_size: u64) -> Self {
        self.file_size = file_size;
        self
    }

    pub fn with_num_files(mut self, num_files: usize) -> Self {
        self.num_files = num_files;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_size == 0 {
            return Err(ParcpError::ConfigError(
                "file size must be greater than 0".to_string(),
            ));
        }
        if self.num_files == 0 {
            return Err(ParcpError::ConfigError(
                "number of files must be greater than 0".to_string(),
            ));
        }
        if !self.dir.is_dir() {
            return Err(ParcpError::ConfigError(format!(
                "target directory does not exist: {}",
                self.dir.display()
            )));
        }
        Ok(())
    }
}

/// Configuration for a full benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Directory test files are generated into and read back from.
    pub source_dir: PathBuf,
    /// Directory disk copies are written into.
    pub dest_dir: PathBuf,
    /// Size of each test file in bytes.
    pub file_size: u64,
    pub num_files: usize,
    /// Where to persist the report as JSON, if anywhere.
    pub json_output: Option<PathBuf>,
}

impl BenchmarkConfig {
    pub fn new(source_dir: PathBuf, dest_dir: PathBuf, file_size: u64, num_files: usize) -> Self {
        Self {
            source_dir,
            dest_dir,
            file_size,
            num_files,
            json_output: None,
        }
    }

    pub fn with_json_output(mut self, path: PathBuf) -> Self {
        self.json_output = Some(path);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_size == 0 {
            return Err(ParcpError::ConfigError(
                "file size must be greater than 0".to_string(),
            ));
        }
        if self.num_files == 0 {
            return Err(ParcpError::ConfigError(
                "number of files must be greater than 0".to_string(),
            ));
        }
        if !self.source_dir.is_dir() {
            return Err(ParcpError::ConfigError(format!(
                "source directory does not exist: {}",
                self.source_dir.display()
            )));
        }
        if !self.dest_dir.is_dir() {
            return Err(ParcpError::ConfigError(format!(
                "destination directory does not exist: {}",
                self.dest_dir.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_strategy_round_trips_through_str() {
        for strategy in [
            CopyStrategy::SystemCp,
            CopyStrategy::Mmap,
            CopyStrategy::DirectIo,
            CopyStrategy::MemoryImpact,
        ] {
            assert_eq!(strategy.as_str().parse::<CopyStrategy>().unwrap(), strategy);
        }
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!("rsync".parse::<CopyStrategy>().is_err());
        assert!("".parse::<CopyStrategy>().is_err());
        // Matching is exact, no case folding
        assert!("MMAP".parse::<CopyStrategy>().is_err());
    }

    #[test]
    fn test_copy_config_requires_sources() {
        let dir = tempdir().unwrap();
        let config = CopyConfig::new(vec![], dir.path().to_path_buf(), CopyStrategy::SystemCp);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_copy_config_requires_dest_dir() {
        let config = CopyConfig::new(
            vec![PathBuf::from("a.dat")],
            PathBuf::from("/nonexistent/parcp/dest"),
            CopyStrategy::Mmap,
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_generate_config_rejects_zero_values() {
        let dir = tempdir().unwrap();
        let config = GenerateConfig::new(dir.path().to_path_buf(), 1024, 4);
        assert!(config.validate().is_ok());
        assert!(config.clone().with_file_size(0).validate().is_err());
        assert!(config.with_num_files(0).validate().is_err());
    }

    #[test]
    fn test_benchmark_config_validates_both_dirs() {
        let source = tempdir().unwrap();
        let dest = tempdir().unwrap();

        let config = BenchmarkConfig::new(
            source.path().to_path_buf(),
            dest.path().to_path_buf(),
            1024,
            2,
        );
        assert!(config.validate().is_ok());

        let bad = BenchmarkConfig::new(
            source.path().to_path_buf(),
            PathBuf::from("/nonexistent/parcp/dest"),
            1024,
            2,
        );
        assert!(bad.validate().is_err());
    }
}
