//! Buffered copy through the operating system's native path.

use crate::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Copy `source` to `destination` through `std::fs::copy`, which uses the
/// platform's accelerated copy call where one exists (copy_file_range,
/// CopyFileEx).
pub fn copy_file(source: &Path, destination: &Path) -> Result<()> {
    let copied = fs::copy(source, destination)?;
    debug!(
        source = %source.display(),
        destination = %destination.display(),
        bytes = copied,
        "system copy complete"
    );
    Ok(())
}
