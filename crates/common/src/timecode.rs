//! Timecode parsing and formatting.
//!
//! Edit jobs express times as strings in any of three forms: `"SS"`,
//! `"MM:SS"`, or `"HH:MM:SS"` (fractional seconds allowed in the last
//! component). Parsing folds the `:`-separated components left to right
//! as `acc * 60 + component`, which handles all three forms with one
//! loop.

use crate::error::{ReelcutError, ReelcutResult};

/// Parse a timecode string into seconds.
///
/// Accepts `"90"`, `"1:30"`, and `"00:01:30"` (all 90 seconds).
pub fn parse_timecode(input: &str) -> ReelcutResult<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ReelcutError::job("Empty timecode"));
    }

    let mut seconds = 0.0f64;
    for component in trimmed.split(':') {
        let value: f64 = component.parse().map_err(|_| {
            ReelcutError::job(format!("Invalid timecode component {component:?} in {input:?}"))
        })?;
        seconds = seconds * 60.0 + value;
    }

    if seconds < 0.0 {
        return Err(ReelcutError::job(format!("Negative timecode {input:?}")));
    }

    Ok(seconds)
}

/// Format a seconds value the way filter expressions expect it:
/// no trailing zeros, no exponent, at most millisecond precision.
///
/// `2.0` renders as `"2"`, `2.5` as `"2.5"`.
pub fn format_seconds(seconds: f64) -> String {
    if seconds.fract() == 0.0 {
        format!("{}", seconds as i64)
    } else {
        let mut text = format!("{seconds:.3}");
        while text.ends_with('0') {
            text.pop();
        }
        text
    }
}

/// Format seconds as `H:MM:SS.mmm` for human-readable progress display.
pub fn format_timecode(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let secs = (total_ms / 1000) % 60;
    let mins = (total_ms / 60_000) % 60;
    let hours = total_ms / 3_600_000;
    format!("{hours}:{mins:02}:{secs:02}.{ms:03}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_all_three_forms() {
        assert_eq!(parse_timecode("00:01:30").unwrap(), 90.0);
        assert_eq!(parse_timecode("1:30").unwrap(), 90.0);
        assert_eq!(parse_timecode("90").unwrap(), 90.0);
    }

    #[test]
    fn test_parse_fractional_seconds() {
        assert_eq!(parse_timecode("2.5").unwrap(), 2.5);
        assert_eq!(parse_timecode("0:02.5").unwrap(), 2.5);
        assert_eq!(parse_timecode("01:00:00.250").unwrap(), 3600.25);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timecode("").is_err());
        assert!(parse_timecode("abc").is_err());
        assert!(parse_timecode("1:xx").is_err());
        assert!(parse_timecode("-5").is_err());
    }

    #[test]
    fn test_format_seconds_minimal() {
        assert_eq!(format_seconds(2.0), "2");
        assert_eq!(format_seconds(2.5), "2.5");
        assert_eq!(format_seconds(0.25), "0.25");
    }

    #[test]
    fn test_format_timecode_display() {
        assert_eq!(format_timecode(90.0), "0:01:30.000");
        assert_eq!(format_timecode(3661.5), "1:01:01.500");
    }

    proptest! {
        #[test]
        fn prop_format_seconds_round_trips(secs in 0.0f64..86_400.0) {
            // millisecond precision is the contract, so compare at 1ms
            let rendered = format_seconds((secs * 1000.0).round() / 1000.0);
            let parsed = parse_timecode(&rendered).unwrap();
            prop_assert!((parsed - (secs * 1000.0).round() / 1000.0).abs() < 1e-9);
        }

        #[test]
        fn prop_plain_seconds_parse_to_themselves(secs in 0u32..100_000) {
            prop_assert_eq!(parse_timecode(&secs.to_string()).unwrap(), secs as f64);
        }
    }
}
