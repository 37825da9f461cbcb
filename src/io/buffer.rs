//! Aligned buffer allocation.
//!
//! Direct I/O requires buffers aligned to the device block size, and the
//! memory-bandwidth probe requires page-aligned buffers it can sample at
//! 64-bit granularity. `Vec<u8>` guarantees neither, so buffers are allocated
//! through `std::alloc` with an explicit layout.

use crate::{ParcpError, Result};
use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::fmt;
use std::ptr::NonNull;
use std::slice;

/// Owned, fixed-capacity byte buffer with a guaranteed start alignment.
pub struct AlignedBuffer {
    ptr: NonNull<u8>,
    len: usize,
    layout: Layout,
}

impl AlignedBuffer {
    /// Allocate a zeroed buffer of `len` bytes aligned to `align`.
    pub fn new(len: usize, align: usize) -> Result<Self> {
        if len == 0 {
            return Err(ParcpError::ConfigError(
                "aligned buffer length must be greater than 0".to_string(),
            ));
        }
        let layout = Layout::from_size_align(len, align).map_err(|e| {
            ParcpError::ConfigError(format!("invalid buffer layout ({}x{}): {}", len, align, e))
        })?;

        // SAFETY: the layout has non-zero size, checked above.
        let raw = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).ok_or_else(|| {
            ParcpError::CopyError(format!("failed to allocate {} byte aligned buffer", len))
        })?;

        Ok(Self { ptr, len, layout })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: ptr points to a live allocation of exactly len bytes.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: ptr points to a live allocation of exactly len bytes, and
        // &mut self guarantees exclusive access.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }
}

// SAFETY: the buffer exclusively owns its allocation; sending it to another
// thread transfers that ownership.
unsafe impl Send for AlignedBuffer {}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        // SAFETY: ptr was allocated with exactly this layout.
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

impl fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("align", &self.layout.align())
            .finish()
    }
}

/// System memory page size.
pub fn page_size() -> usize {
    #[cfg(unix)]
    // SAFETY: sysconf is always safe to call.
    unsafe {
        libc::sysconf(libc::_SC_PAGESIZE) as usize
    }
    #[cfg(windows)]
    {
        4096
    }
}
