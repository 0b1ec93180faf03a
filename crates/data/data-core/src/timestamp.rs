//! Timestamp parsing shared by the HTTP and SQLite sources.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use data_spi::{DataError, Result};

/// Format used when writing timestamps to the store.
pub const STORE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp written by the APIs, by pandas or by this crate.
///
/// Strings without an offset are taken as UTC.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Ok(t.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(t.and_utc());
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(t) = d.and_hms_opt(0, 0, 0) {
            return Ok(t.and_utc());
        }
    }
    Err(DataError::ParseError(format!("unrecognized timestamp: {}", text)))
}

/// Interpret an integer column as Unix seconds.
pub fn from_unix_seconds(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| DataError::ParseError(format!("timestamp {} out of range", secs)))
}

pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.format(STORE_FORMAT).to_string()
}
