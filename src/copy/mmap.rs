//! Memory-mapped copy.
//!
//! Source and destination are mapped in windows of at most
//! [`MMAP_CHUNK_SIZE`] and copied page-cache to page-cache. Each destination
//! window is flushed before the next one is mapped so the file is durable
//! when the copy returns.

use crate::{Result, MMAP_CHUNK_SIZE};
use memmap2::MmapOptions;
use std::fs::{File, OpenOptions};
use std::path::Path;
use tracing::debug;

/// Copy `size` bytes from `source` to `destination` through mapped windows.
pub fn copy_file(source: &Path, destination: &Path, size: u64) -> Result<()> {
    let src_file = File::open(source)?;
    let dst_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(destination)?;
    dst_file.set_len(size)?;

    if size == 0 {
        return Ok(());
    }

    let mut offset = 0u64;
    while offset < size {
        let window = (size - offset).min(MMAP_CHUNK_SIZE) as usize;

        // SAFETY: both files stay open and unresized for the lifetime of the
        // maps, and the destination map is the only writer of its range.
        let src_map = unsafe {
            MmapOptions::new()
                .offset(offset)
                .len(window)
                .map(&src_file)?
        };
        let mut dst_map = unsafe {
            MmapOptions::new()
                .offset(offset)
                .len(window)
                .map_mut(&dst_file)?
        };

        dst_map.copy_from_slice(&src_map);
        dst_map.flush()?;

        debug!(offset, window, "mapped window copied");
        offset += window as u64;
    }

    Ok(())
}
