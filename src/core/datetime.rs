//! Timestamp formatting for stored entries.
//!
//! Entries are stored with a UTC timestamp in `%Y-%m-%d %H:%M:%S` form, which
//! sorts lexically and is what `SQLite`'s own date functions produce.

use chrono::{DateTime, NaiveDateTime, Utc};

const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp for storage.
#[must_use]
pub fn format_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.format(STORAGE_FORMAT).to_string()
}

/// Parse a stored timestamp.
///
/// Accepts the storage format and RFC 3339 for rows written by other tools.
#[must_use]
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, STORAGE_FORMAT) {
        return Some(naive.and_utc());
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
