// ABOUTME: Duration parsing for podcast episode lengths.
// ABOUTME: Supports integer seconds, digit-only strings, MM:SS and HH:MM:SS.

use crate::models::DurationValue;

/// Parses feed duration metadata into whole seconds.
/// Integers pass through unchanged; strings go through `parse_duration_str`.
pub fn parse_duration(value: Option<&DurationValue>) -> Option<u64> {
    match value? {
        DurationValue::Seconds(secs) => Some(*secs),
        DurationValue::Text(s) => parse_duration_str(s),
    }
}

/// Parses a duration string into seconds.
/// Supports:
/// - Plain digit strings (seconds)
/// - MM:SS format
/// - HH:MM:SS format
///
/// Segments between colons that are not purely digits are discarded before
/// counting, so "1:xx:30" reads as MM:SS. Returns None for anything else.
pub fn parse_duration_str(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if is_digits(s) {
        return s.parse().ok();
    }

    let parts: Vec<&str> = s.split(':').filter(|part| is_digits(part)).collect();
    if parts.is_empty() {
        return None;
    }

    let mut values = Vec::with_capacity(parts.len());
    for part in parts {
        values.push(part.parse::<u64>().ok()?);
    }

    match values.as_slice() {
        [mins, secs] => mins.checked_mul(60)?.checked_add(*secs),
        [hours, mins, secs] => hours
            .checked_mul(3600)?
            .checked_add(mins.checked_mul(60)?)?
            .checked_add(*secs),
        _ => None,
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
