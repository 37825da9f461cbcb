//! Copy strategy implementations.
//!
//! Each strategy moves one file's bytes from source to destination (except
//! the memory-impact probe, which never touches the paths). Dispatch lives
//! on [`CopyStrategy`] so task execution stays a single call.

pub mod direct;
pub mod membw;
pub mod mmap;
pub mod system;

use crate::config::CopyStrategy;
use crate::Result;
use std::path::Path;

impl CopyStrategy {
    /// Copy `size` bytes from `source` to `destination` using this strategy.
    ///
    /// For [`CopyStrategy::MemoryImpact`] the paths are ignored; only `size`
    /// drives the in-memory probe.
    pub fn copy(&self, source: &Path, destination: &Path, size: u64) -> Result<()> {
        match self {
            CopyStrategy::SystemCp => system::copy_file(source, destination),
            CopyStrategy::Mmap => mmap::copy_file(source, destination, size),
            CopyStrategy::DirectIo => direct::copy_file(source, destination, size),
            CopyStrategy::MemoryImpact => membw::run_probe(size),
        }
    }
}
