//! Deterministic pseudorandom data generation.
//!
//! A linear congruential generator produces the content for test files and
//! for the memory-bandwidth probe's source buffer. Identical parameters and
//! call counts always reproduce identical output, which is what makes
//! byte-for-byte content comparison possible in tests.

use std::sync::atomic::{fence, Ordering};

pub const DEFAULT_SEED: u64 = 0x0123456789ABCDEF;
pub const DEFAULT_MULTIPLIER: u64 = 6364136223846793005;
pub const DEFAULT_INCREMENT: u64 = 1;

/// 64-bit linear congruential generator: `state' = state * multiplier + increment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomGenerator {
    state: u64,
    multiplier: u64,
    increment: u64,
}

impl RandomGenerator {
    /// Create a generator with the default parameters.
    pub fn new() -> Self {
        Self::with_parameters(DEFAULT_SEED, DEFAULT_MULTIPLIER, DEFAULT_INCREMENT)
    }

    /// Create a generator with explicit seed, multiplier, and increment.
    pub fn with_parameters(seed: u64, multiplier: u64, increment: u64) -> Self {
        Self {
            state: seed,
            multiplier,
            increment,
        }
    }

    /// Advance the state and return it.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(self.multiplier)
            .wrapping_add(self.increment);
        self.state
    }

    /// Fill `buf` with consecutive generator output, one 64-bit word per
    /// 8 bytes, advancing the state in place. The length must be a multiple
    /// of 8. A full memory barrier is issued after the fill so every write is
    /// globally visible before a concurrent reader samples the buffer.
    pub fn fill(&mut self, buf: &mut [u8]) {
        debug_assert_eq!(buf.len() % 8, 0, "fill length must be a multiple of 8");
        for word in buf.chunks_exact_mut(8) {
            word.copy_from_slice(&self.next_u64().to_le_bytes());
        }
        fence(Ordering::SeqCst);
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}
