//! Test-file generation.
//!
//! Writes deterministic pseudorandom content through the direct-write path
//! so generation itself does not warm the page cache with the data the
//! benchmark is about to read back.

use crate::io::{AlignedBuffer, DiskIO, PlatformDiskIO};
use crate::rng::RandomGenerator;
use crate::{ParcpError, Result, BLOCK_SIZE};
use std::path::Path;
use tracing::debug;

/// Size of the write buffer. One fill of generator output is reused for
/// every chunk of the file.
pub const GENERATOR_BUFFER_SIZE: usize = 1024 * 1024;

/// Create `path` with `size` bytes of generator output.
///
/// On a handle that really bypasses the page cache the final chunk is
/// rounded down to a whole block, so a size that is not a multiple of
/// [`BLOCK_SIZE`] produces a file short by the sub-block tail.
pub fn generate_test_file(path: &Path, size: u64) -> Result<()> {
    let disk_io = PlatformDiskIO::new();
    let mut file = disk_io.open_direct_write(path)?;

    let mut buffer = AlignedBuffer::new(GENERATOR_BUFFER_SIZE, BLOCK_SIZE)?;
    RandomGenerator::new().fill(buffer.as_mut_slice());

    let block = BLOCK_SIZE as u64;
    let mut remaining = size;
    while remaining > 0 {
        let mut to_write = remaining.min(GENERATOR_BUFFER_SIZE as u64);
        if file.is_direct() && to_write % block != 0 {
            to_write = to_write / block * block;
            if to_write == 0 {
                break;
            }
        }

        let written = file.write_direct(&buffer.as_slice()[..to_write as usize])?;
        if written as u64 != to_write {
            return Err(ParcpError::IoError(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                format!("short write while generating {}", path.display()),
            )));
        }
        remaining -= to_write;
    }

    file.sync_all()?;
    debug!(path = %path.display(), size, "test file generated");
    Ok(())
}
