//! Millisecond helpers shared by the timer, the config and the CLI.

use crate::error::TimerError;

pub const MILLIS_IN_SECOND: u64 = 1_000;
pub const MILLIS_IN_MINUTE: u64 = MILLIS_IN_SECOND * 60;

/// Render a countdown as `m:ss`. Minutes are not wrapped into hours.
pub fn format_millis(millis: u64) -> String {
    let minutes = millis / MILLIS_IN_MINUTE;
    let seconds = (millis % MILLIS_IN_MINUTE) / MILLIS_IN_SECOND;
    format!("{minutes}:{seconds:02}")
}

/// Combine a minutes/seconds pair into milliseconds.
///
/// Fractional inputs are accepted; NaN, infinite and negative results are
/// rejected.
pub fn millis_from_parts(minutes: f64, seconds: f64) -> Result<u64, TimerError> {
    let result = minutes * MILLIS_IN_MINUTE as f64 + seconds * MILLIS_IN_SECOND as f64;

    if !result.is_finite() || result < 0.0 {
        return Err(TimerError::InvalidDuration(format!(
            "{minutes} min {seconds} s is not a valid duration"
        )));
    }
    if result > u64::MAX as f64 {
        return Err(TimerError::InvalidDuration(format!("{result} ms is too large")));
    }

    Ok(result.round() as u64)
}

/// Parse a human duration.
///
/// Accepts `25` (minutes), `25m`, `90s`, `1m30s` and `1500ms`.
pub fn parse_duration(input: &str) -> Result<u64, TimerError> {
    let text = input.trim();
    let invalid = || TimerError::InvalidDuration(format!("cannot parse '{input}'"));

    if text.is_empty() {
        return Err(invalid());
    }

    if let Some(ms) = text.strip_suffix("ms") {
        return ms.trim().parse::<u64>().map_err(|_| invalid());
    }

    if let Ok(minutes) = text.parse::<f64>() {
        return millis_from_parts(minutes, 0.0);
    }

    let mut minutes = 0.0;
    let mut seconds = 0.0;
    let mut number = String::new();
    let mut seen_minutes = false;
    let mut seen_seconds = false;

    for ch in text.chars() {
        match ch {
            '0'..='9' | '.' => number.push(ch),
            'm' if !seen_minutes && !seen_seconds && !number.is_empty() => {
                minutes = number.parse::<f64>().map_err(|_| invalid())?;
                number.clear();
                seen_minutes = true;
            }
            's' if !seen_seconds && !number.is_empty() => {
                seconds = number.parse::<f64>().map_err(|_| invalid())?;
                number.clear();
                seen_seconds = true;
            }
            _ => return Err(invalid()),
        }
    }

    if !number.is_empty() || !(seen_minutes || seen_seconds) {
        return Err(invalid());
    }

    millis_from_parts(minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_millis(0), "0:00");
        assert_eq!(format_millis(1_500_000), "25:00");
        assert_eq!(format_millis(65_999), "1:05");
        assert_eq!(format_millis(90 * MILLIS_IN_MINUTE), "90:00");
    }

    #[test]
    fn parts_reject_nan_and_negative() {
        assert!(millis_from_parts(f64::NAN, 0.0).is_err());
        assert!(millis_from_parts(f64::INFINITY, 0.0).is_err());
        assert!(millis_from_parts(-1.0, 0.0).is_err());
        assert_eq!(millis_from_parts(1.0, 30.0).unwrap(), 90_000);
    }

    #[test]
    fn parses_supported_forms() {
        assert_eq!(parse_duration("25").unwrap(), 1_500_000);
        assert_eq!(parse_duration("25m").unwrap(), 1_500_000);
        assert_eq!(parse_duration("90s").unwrap(), 90_000);
        assert_eq!(parse_duration("1m30s").unwrap(), 90_000);
        assert_eq!(parse_duration("1500ms").unwrap(), 1_500);
        assert_eq!(parse_duration(" 5m ").unwrap(), 300_000);
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "m", "5x", "30s1m", "1m2", "-5m", "5mm"] {
            assert!(parse_duration(bad).is_err(), "accepted {bad:?}");
        }
    }
}
