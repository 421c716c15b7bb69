//! Timestamp formatting for display.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};

/// Display format for timestamps.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse an ISO 8601 timestamp.
///
/// Accepts RFC 3339 (with offset) and naive date-times as produced by the
/// backend's `isoformat()`, which are taken to be UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Format a timestamp for display in the given zone.
///
/// `None` uses the viewer's local zone. Unparseable input is returned
/// verbatim so display never fails.
pub fn format_timestamp(raw: &str, offset: Option<FixedOffset>) -> String {
    match parse_timestamp(raw) {
        Some(dt) => match offset {
            Some(offset) => dt.with_timezone(&offset).format(DISPLAY_FORMAT).to_string(),
            None => dt.with_timezone(&Local).format(DISPLAY_FORMAT).to_string(),
        },
        None => raw.to_string(),
    }
}
