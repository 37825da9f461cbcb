//! Platform I/O: aligned buffers and direct (unbuffered) file access.

pub mod buffer;
pub mod disk;

pub use buffer::{page_size, AlignedBuffer};
pub use disk::{DirectFile, DiskIO, PlatformDiskIO};
