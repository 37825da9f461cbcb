//! Utility functions for size literals and throughput math.

pub mod units;

pub use units::{bytes_to_mib, parse_size, speed_mib_per_sec};
