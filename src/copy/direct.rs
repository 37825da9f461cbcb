//! Unbuffered block-aligned copy.
//!
//! Reads and writes go through [`PlatformDiskIO`] handles, which bypass the
//! page cache where the filesystem allows it. Every transfer length is a
//! multiple of [`BLOCK_SIZE`], so a file with a sub-block tail leaves that
//! tail uncopied: the destination is short and the copy reports an error
//! with the leftover byte count.

use crate::io::{AlignedBuffer, DiskIO, PlatformDiskIO};
use crate::{ParcpError, Result, BLOCK_SIZE, MAX_READ_SIZE};
use std::path::Path;
use tracing::debug;

/// Transfer buffer size for a file of `size` bytes: the size rounded up to a
/// whole block, clamped to at most [`MAX_READ_SIZE`].
fn buffer_capacity(size: u64) -> usize {
    let block = BLOCK_SIZE as u64;
    let rounded = size.div_ceil(block) * block;
    rounded.clamp(block, MAX_READ_SIZE) as usize
}

/// Copy `size` bytes from `source` to `destination` with direct I/O.
pub fn copy_file(source: &Path, destination: &Path, size: u64) -> Result<()> {
    let disk_io = PlatformDiskIO::new();
    let mut reader = disk_io.open_direct_read(source)?;
    let mut writer = disk_io.open_direct_write(destination)?;

    let mut buffer = AlignedBuffer::new(buffer_capacity(size), BLOCK_SIZE)?;
    let capacity = buffer.len() as u64;
    let block = BLOCK_SIZE as u64;

    let mut remaining = size;
    loop {
        // Round the chunk down to a whole block; a sub-block tail is never
        // transferred.
        let to_read = (remaining.min(capacity) / block * block) as usize;
        if to_read == 0 {
            break;
        }

        let read = reader.read_direct(&mut buffer.as_mut_slice()[..to_read])?;
        if read == 0 {
            break;
        }

        let written = writer.write_direct(&buffer.as_slice()[..read])?;
        if written != read {
            break;
        }

        remaining -= read as u64;
        if read < to_read {
            break;
        }
    }

    writer.sync_all()?;

    if remaining != 0 {
        debug!(
            source = %source.display(),
            remaining,
            "direct copy left bytes untransferred"
        );
        return Err(ParcpError::CopyError(format!(
            "direct copy of {} incomplete: {} bytes untransferred",
            source.display(),
            remaining
        )));
    }

    debug!(
        source = %source.display(),
        destination = %destination.display(),
        bytes = size,
        "direct copy complete"
    );
    Ok(())
}
