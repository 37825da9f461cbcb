//! Size literal parsing and throughput conversion.
//!
//! Size literals follow the `<decimal digits><unit>` grammar with unit one of
//! M, G, or T (case-insensitive, binary multiples). Anything else is a parse
//! error, reported before any task starts.

use crate::{ParcpError, Result};
use std::time::Duration;

pub const MIB: u64 = 1024 * 1024;
pub const GIB: u64 = 1024 * MIB;
pub const TIB: u64 = 1024 * GIB;

/// Parse a size literal like `100M`, `2G`, or `1T` into bytes.
///
/// # Examples
/// ```
/// use parcp::util::units::parse_size;
///
/// assert_eq!(parse_size("2G").unwrap(), 2 * 1024 * 1024 * 1024);
/// assert!(parse_size("7X").is_err());
/// ```
pub fn parse_size(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    let unit = trimmed
        .chars()
        .last()
        .ok_or_else(|| ParcpError::ParseError("empty size literal".to_string()))?;
    let digits = &trimmed[..trimmed.len() - unit.len_utf8()];

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParcpError::ParseError(format!(
            "invalid size literal: {}",
            input
        )));
    }

    let value: u64 = digits.parse().map_err(|_| {
        ParcpError::ParseError(format!("invalid size literal: {}", input))
    })?;

    let multiplier = match unit.to_ascii_uppercase() {
        'M' => MIB,
        'G' => GIB,
        'T' => TIB,
        other => {
            return Err(ParcpError::ParseError(format!(
                "unknown size unit '{}' in {}",
                other, input
            )))
        }
    };

    value.checked_mul(multiplier).ok_or_else(|| {
        ParcpError::ParseError(format!("size literal overflows: {}", input))
    })
}

/// Convert a byte count to mebibytes.
pub fn bytes_to_mib(bytes: u64) -> f64 {
    bytes as f64 / MIB as f64
}

/// Throughput in MiB/s. A zero duration yields an infinite (or NaN for zero
/// bytes) speed; transfers fast enough to round to zero are reported as-is
/// rather than clamped.
pub fn speed_mib_per_sec(bytes: u64, duration: Duration) -> f64 {
    bytes_to_mib(bytes) / duration.as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_units() {
        assert_eq!(parse_size("100M").unwrap(), 100 * 1024 * 1024);
        assert_eq!(parse_size("2G").unwrap(), 2 * 1024 * 1024 * 1024);
        assert_eq!(parse_size("1T").unwrap(), 1024u64 * 1024 * 1024 * 1024);
    }

    #[test]
    fn test_parse_size_case_insensitive() {
        assert_eq!(parse_size("2g").unwrap(), parse_size("2G").unwrap());
        assert_eq!(parse_size("5m").unwrap(), 5 * 1024 * 1024);
    }

    #[test]
    fn test_parse_size_rejects_malformed_literals() {
        assert!(parse_size("7X").is_err());
        assert!(parse_size("abc").is_err());
        assert!(parse_size("").is_err());
        assert!(parse_size("M").is_err());
        assert!(parse_size("10").is_err());
        assert!(parse_size("1.5G").is_err());
        assert!(parse_size("-1G").is_err());
        assert!(parse_size("10K").is_err());
    }

    #[test]
    fn test_parse_size_overflow() {
        assert!(parse_size("99999999999T").is_err());
    }

    #[test]
    fn test_bytes_to_mib() {
        assert_eq!(bytes_to_mib(1024 * 1024), 1.0);
        assert_eq!(bytes_to_mib(512 * 1024), 0.5);
    }

    #[test]
    fn test_speed_normal() {
        let speed = speed_mib_per_sec(10 * 1024 * 1024, Duration::from_secs(2));
        assert!((speed - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_speed_zero_duration_is_infinite() {
        // Very fast transfers divide by zero; the boundary is observable,
        // not guarded.
        let speed = speed_mib_per_sec(1024 * 1024, Duration::ZERO);
        assert!(speed.is_infinite());
    }
}
