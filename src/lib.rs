//! parcp - parallel file-copy benchmark
//!
//! Measures and compares the throughput of distinct file-copy strategies
//! (system copy, memory-mapped, aligned direct I/O) and estimates whether
//! observed disk-copy speed is capped by host memory bandwidth rather than
//! storage bandwidth.

use std::fmt;

pub mod bench;
pub mod config;
pub mod copy;
pub mod io;
pub mod models;
pub mod rng;
pub mod testfile;
pub mod util;

/// Device block size all direct-I/O transfers are aligned to.
pub const BLOCK_SIZE: usize = 512;
/// Ceiling for a single direct-I/O buffer and for one memory-probe pass.
pub const MAX_READ_SIZE: u64 = 1024 * 1024 * 1024;
/// Window size for memory-mapped copies.
pub const MMAP_CHUNK_SIZE: u64 = 512 * 1024 * 1024;
/// Block size the memory-bandwidth probe transfers in.
pub const DMA_BLOCK_SIZE: u64 = 2 * 1024 * 1024;
/// Name prefix for generated benchmark files.
pub const TEST_FILE_PREFIX: &str = "test_file_";
/// Disk-to-memory speed ratio at which the bandwidth-wall warning fires.
pub const BANDWIDTH_WALL_RATIO: f64 = 0.95;

// Common error types
#[derive(Debug)]
pub enum ParcpError {
    /// I/O operation failed
    IoError(std::io::Error),
    /// Configuration validation error
    ConfigError(String),
    /// Malformed size literal or unknown mode string
    ParseError(String),
    /// A copy strategy or the test-file generator failed
    CopyError(String),
    /// Task spawning or joining failed
    WorkerError(String),
    /// Report persistence error
    PersistenceError(String),
}

impl fmt::Display for ParcpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParcpError::IoError(err) => write!(f, "I/O error: {}", err),
            ParcpError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ParcpError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ParcpError::CopyError(msg) => write!(f, "Copy error: {}", msg),
            ParcpError::WorkerError(msg) => write!(f, "Worker error: {}", msg),
            ParcpError::PersistenceError(msg) => write!(f, "Persistence error: {}", msg),
        }
    }
}

impl std::error::Error for ParcpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParcpError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParcpError {
    fn from(err: std::io::Error) -> Self {
        ParcpError::IoError(err)
    }
}

impl From<serde_json::Error> for ParcpError {
    fn from(err: serde_json::Error) -> Self {
        ParcpError::PersistenceError(format!("JSON serialization error: {}", err))
    }
}

/// Result type alias for parcp operations
pub type Result<T> = std::result::Result<T, ParcpError>;
