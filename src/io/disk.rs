//! Cross-platform direct (unbuffered) file access.
//!
//! Opens files with O_DIRECT on Unix and FILE_FLAG_NO_BUFFERING on Windows,
//! falling back to cached I/O when the filesystem refuses the flags (tmpfs,
//! network mounts). Callers only see the `DirectFile` trait; the copy
//! strategies and the test-file generator stay platform-free.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Cross-platform disk I/O operations trait
pub trait DiskIO {
    /// Open a file for direct read operations (bypassing the OS page cache)
    fn open_direct_read(&self, path: &Path) -> io::Result<Box<dyn DirectFile>>;

    /// Create a file for direct write operations (bypassing the OS page cache)
    fn open_direct_write(&self, path: &Path) -> io::Result<Box<dyn DirectFile>>;
}

/// Direct file operations trait for unbuffered I/O
pub trait DirectFile: Send {
    /// Read data directly from disk
    fn read_direct(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write data directly to disk
    fn write_direct(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Seek to position
    fn seek_direct(&mut self, pos: SeekFrom) -> io::Result<u64>;

    /// Force synchronization to disk
    fn sync_all(&mut self) -> io::Result<()>;

    /// Get file size
    fn file_size(&self) -> io::Result<u64>;

    /// Whether this handle actually bypasses the page cache. Direct handles
    /// only accept block-aligned transfer lengths.
    fn is_direct(&self) -> bool;
}

/// Platform-specific disk I/O implementation
#[derive(Clone)]
pub struct PlatformDiskIO;

impl PlatformDiskIO {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlatformDiskIO {
    fn default() -> Self {
        Self::new()
    }
}

struct PlatformDirectFile {
    file: File,
    direct: bool,
}

impl PlatformDirectFile {
    fn new(file: File, direct: bool) -> Self {
        Self { file, direct }
    }
}

impl DirectFile for PlatformDirectFile {
    fn read_direct(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }

    fn write_direct(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn seek_direct(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }

    fn sync_all(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }

    fn file_size(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    fn is_direct(&self) -> bool {
        self.direct
    }
}

#[cfg(unix)]
mod unix_impl {
    use super::*;
    use std::fs::OpenOptions;
    use std::os::unix::fs::OpenOptionsExt;

    impl DiskIO for PlatformDiskIO {
        fn open_direct_read(&self, path: &Path) -> io::Result<Box<dyn DirectFile>> {
            // Try O_DIRECT first, fall back to cached I/O
            match OpenOptions::new()
                .read(true)
                .custom_flags(libc::O_DIRECT)
                .open(path)
            {
                Ok(file) => Ok(Box::new(PlatformDirectFile::new(file, true))),
                Err(_) => {
                    let file = OpenOptions::new().read(true).open(path)?;
                    Ok(Box::new(PlatformDirectFile::new(file, false)))
                }
            }
        }

        fn open_direct_write(&self, path: &Path) -> io::Result<Box<dyn DirectFile>> {
            match OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .custom_flags(libc::O_DIRECT)
                .open(path)
            {
                Ok(file) => Ok(Box::new(PlatformDirectFile::new(file, true))),
                Err(_) => {
                    let file = OpenOptions::new()
                        .write(true)
                        .create(true)
                        .truncate(true)
                        .open(path)?;
                    Ok(Box::new(PlatformDirectFile::new(file, false)))
                }
            }
        }
    }
}

#[cfg(windows)]
mod windows_impl {
    use super::*;
    use std::fs::OpenOptions;
    use std::os::windows::fs::OpenOptionsExt;

    const FILE_FLAG_WRITE_THROUGH: u32 = 0x80000000;
    const FILE_FLAG_NO_BUFFERING: u32 = 0x20000000;

    impl DiskIO for PlatformDiskIO {
        fn open_direct_read(&self, path: &Path) -> io::Result<Box<dyn DirectFile>> {
            match OpenOptions::new()
                .read(true)
                .custom_flags(FILE_FLAG_NO_BUFFERING)
                .open(path)
            {
                Ok(file) => Ok(Box::new(PlatformDirectFile::new(file, true))),
                Err(_) => {
                    let file = OpenOptions::new().read(true).open(path)?;
                    Ok(Box::new(PlatformDirectFile::new(file, false)))
                }
            }
        }

        fn open_direct_write(&self, path: &Path) -> io::Result<Box<dyn DirectFile>> {
            match OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .custom_flags(FILE_FLAG_WRITE_THROUGH | FILE_FLAG_NO_BUFFERING)
                .open(path)
            {
                Ok(file) => Ok(Box::new(PlatformDirectFile::new(file, true))),
                Err(_) => {
                    let file = OpenOptions::new()
                        .write(true)
                        .create(true)
                        .truncate(true)
                        .open(path)?;
                    Ok(Box::new(PlatformDirectFile::new(file, false)))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::buffer::AlignedBuffer;
    use crate::BLOCK_SIZE;
    use tempfile::tempdir;

    #[test]
    fn test_direct_write_then_read_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("direct.dat");
        let disk_io = PlatformDiskIO::new();

        let mut buffer = AlignedBuffer::new(4 * BLOCK_SIZE, BLOCK_SIZE).unwrap();
        for (i, byte) in buffer.as_mut_slice().iter_mut().enumerate() {
            *byte = (i % 251) as u8;
        }

        let mut writer = disk_io.open_direct_write(&path).unwrap();
        let written = writer.write_direct(buffer.as_slice()).unwrap();
        assert_eq!(written, 4 * BLOCK_SIZE);
        writer.sync_all().unwrap();
        assert_eq!(writer.file_size().unwrap(), 4 * BLOCK_SIZE as u64);
        drop(writer);

        let mut reader = disk_io.open_direct_read(&path).unwrap();
        let mut readback = AlignedBuffer::new(4 * BLOCK_SIZE, BLOCK_SIZE).unwrap();
        let read = reader.read_direct(readback.as_mut_slice()).unwrap();
        assert_eq!(read, 4 * BLOCK_SIZE);
        assert_eq!(readback.as_slice(), buffer.as_slice());
    }

    #[test]
    fn test_open_direct_read_missing_file_fails() {
        let temp_dir = tempdir().unwrap();
        let disk_io = PlatformDiskIO::new();
        assert!(disk_io
            .open_direct_read(&temp_dir.path().join("missing.dat"))
            .is_err());
    }

    #[test]
    fn test_open_direct_write_truncates() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("trunc.dat");
        std::fs::write(&path, vec![0xFFu8; 2048]).unwrap();

        let disk_io = PlatformDiskIO::new();
        let writer = disk_io.open_direct_write(&path).unwrap();
        assert_eq!(writer.file_size().unwrap(), 0);
    }
}
