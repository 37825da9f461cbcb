//! Memory-bandwidth probe.
//!
//! Simulates a direct-I/O copy without the disk: the same byte volume moves
//! between two page-aligned buffers in [`DMA_BLOCK_SIZE`] blocks, and one
//! 64-bit word per page is read back through a volatile load so the
//! transfers cannot be elided. The resulting throughput is the ceiling the
//! real direct copy is compared against.

use crate::io::{page_size, AlignedBuffer};
use crate::rng::RandomGenerator;
use crate::{ParcpError, Result, DMA_BLOCK_SIZE, MAX_READ_SIZE};
use std::ptr;
use tracing::debug;

/// Run the in-memory probe for a simulated file of `size` bytes.
///
/// Succeeds when the volatile page-sample checksum over the destination is
/// nonzero, which it is for any realistic generator output.
pub fn run_probe(size: u64) -> Result<()> {
    let page = page_size();
    let capacity = probe_capacity(size, page);

    let mut source = AlignedBuffer::new(capacity, page)?;
    let mut destination = AlignedBuffer::new(capacity, page)?;
    RandomGenerator::new().fill(source.as_mut_slice());

    let block = DMA_BLOCK_SIZE as usize;
    let mut checksum = 0u64;
    let mut remaining = size;

    while remaining > 0 {
        let pass = remaining.min(capacity as u64) as usize;
        let mut offset = 0;

        while pass - offset >= block {
            destination.as_mut_slice()[offset..offset + block]
                .copy_from_slice(&source.as_slice()[offset..offset + block]);
            checksum ^= sample_pages(destination.as_ptr(), offset, block, page);
            offset += block;
        }

        let tail = pass - offset;
        if tail > 0 {
            // The tail rounds up to whole pages; both buffers extend at
            // least that far past `offset`.
            let span = tail.div_ceil(page) * page;
            destination.as_mut_slice()[offset..offset + span]
                .copy_from_slice(&source.as_slice()[offset..offset + span]);
            checksum ^= sample_pages(destination.as_ptr(), offset, span, page);
        }

        remaining -= pass as u64;
    }

    debug!(size, checksum, "memory probe complete");

    if checksum == 0 {
        return Err(ParcpError::CopyError(
            "memory probe checksum was zero".to_string(),
        ));
    }
    Ok(())
}

/// Probe buffer size: the simulated file size rounded up to a whole page,
/// clamped to at most [`MAX_READ_SIZE`].
fn probe_capacity(size: u64, page: usize) -> usize {
    let page = page as u64;
    let rounded = size.max(1).div_ceil(page) * page;
    rounded.min(MAX_READ_SIZE) as usize
}

/// XOR together one 64-bit word per page of `base[offset..offset + len]`.
/// Volatile loads keep the preceding copies observable.
fn sample_pages(base: *const u8, offset: usize, len: usize, page: usize) -> u64 {
    let mut acc = 0u64;
    let mut i = 0;
    while i < len {
        // SAFETY: offset + i is page-aligned relative to a page-aligned
        // allocation that extends at least offset + len bytes, so the
        // 8-byte load is in bounds and aligned.
        acc ^= unsafe { ptr::read_volatile(base.add(offset + i) as *const u64) };
        i += page;
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_capacity_rounds_to_page() {
        let page = page_size();
        assert_eq!(probe_capacity(1, page), page);
        assert_eq!(probe_capacity(page as u64, page), page);
        assert_eq!(probe_capacity(page as u64 + 1, page), 2 * page);
    }

    #[test]
    fn test_probe_capacity_clamps_to_max_read() {
        let page = page_size();
        assert_eq!(probe_capacity(MAX_READ_SIZE * 2, page), MAX_READ_SIZE as usize);
    }

    #[test]
    fn test_probe_succeeds_on_block_multiple() {
        run_probe(2 * DMA_BLOCK_SIZE).unwrap();
    }

    #[test]
    fn test_probe_succeeds_on_unaligned_size() {
        // Exercises both the whole-block loop and the rounded-up tail
        run_probe(3 * 1024 * 1024 + 100).unwrap();
    }

    #[test]
    fn test_probe_succeeds_on_sub_page_size() {
        run_probe(100).unwrap();
    }

    #[test]
    fn test_sample_pages_sees_written_words() {
        let page = page_size();
        let mut buffer = AlignedBuffer::new(2 * page, page).unwrap();
        buffer.as_mut_slice()[..8].copy_from_slice(&0xDEADBEEFu64.to_le_bytes());
        buffer.as_mut_slice()[page..page + 8].copy_from_slice(&0x1234u64.to_le_bytes());

        let acc = sample_pages(buffer.as_ptr(), 0, 2 * page, page);
        assert_eq!(acc, 0xDEADBEEF ^ 0x1234);
    }
}
