//! Timestamp parsing and hour-of-day extraction.
//!
//! Readings store their timestamp as an ISO-8601 string. Hourly grouping
//! needs the hour-of-day, which is always taken in UTC:
//!
//! - a timestamp with an offset (`Z`, `+05:30`, `-0600`) is converted to UTC
//! - a timestamp without an offset is read as UTC wall-clock time
//!
//! Minute precision is enough; seconds and fractional seconds are optional,
//! and a single space may replace the `T` separator.

use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::{ParseError, ParseResult};

/// Parse a stored timestamp into a UTC [`OffsetDateTime`].
///
/// # Examples
///
/// ```
/// use citysense_types::parse_timestamp;
///
/// let ts = parse_timestamp("2024-05-01T08:30").unwrap();
/// assert_eq!(ts.hour(), 8);
///
/// let ts = parse_timestamp("2024-05-01T08:30:00+02:00").unwrap();
/// assert_eq!(ts.hour(), 6);
///
/// assert!(parse_timestamp("yesterday").is_err());
/// ```
pub fn parse_timestamp(raw: &str) -> ParseResult<OffsetDateTime> {
    let trimmed = raw.trim();
    let (local, offset) = split_offset(trimmed)
        .ok_or_else(|| ParseError::InvalidTimestamp(raw.to_string()))?;
    let naive =
        parse_naive(local).ok_or_else(|| ParseError::InvalidTimestamp(raw.to_string()))?;

    Ok(naive.assume_offset(offset).to_offset(UtcOffset::UTC))
}

/// Extract the UTC hour-of-day (0-23) from a stored timestamp.
///
/// ```
/// use citysense_types::hour_of_day;
///
/// assert_eq!(hour_of_day("2024-05-01 23:59").unwrap(), 23);
/// assert_eq!(hour_of_day("2024-05-01T23:59:00-01:00").unwrap(), 0);
/// ```
pub fn hour_of_day(raw: &str) -> ParseResult<u8> {
    parse_timestamp(raw).map(|ts| ts.hour())
}

/// Split a trailing UTC offset from the local date-time part.
///
/// Returns `None` when a suffix looks like an offset but is out of range.
fn split_offset(s: &str) -> Option<(&str, UtcOffset)> {
    if let Some(local) = s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        return Some((local, UtcOffset::UTC));
    }

    // The offset can only start after the time separator, which keeps
    // the date's own '-' characters out of consideration.
    let time_start = s.find(['T', ' ']).map_or(s.len(), |i| i + 1);
    let Some(sign_pos) = s[time_start..].rfind(['+', '-']).map(|i| i + time_start) else {
        return Some((s, UtcOffset::UTC));
    };

    let (local, suffix) = s.split_at(sign_pos);
    let offset = UtcOffset::parse(
        suffix,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .or_else(|_| {
        UtcOffset::parse(
            suffix,
            format_description!("[offset_hour sign:mandatory][offset_minute]"),
        )
    })
    .ok()?;

    Some((local, offset))
}

fn parse_naive(s: &str) -> Option<PrimitiveDateTime> {
    let normalized = s.replacen(' ', "T", 1);
    let s = normalized.as_str();

    PrimitiveDateTime::parse(
        s,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            s,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        )
    })
    .or_else(|_| {
        PrimitiveDateTime::parse(s, format_description!("[year]-[month]-[day]T[hour]:[minute]"))
    })
    .ok()
}
