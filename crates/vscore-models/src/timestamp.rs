//! Publish-date parsing.
//!
//! Accepts the timestamp shapes video APIs and spreadsheets commonly emit:
//! - RFC 3339 (`2024-05-01T12:00:00Z`, `2024-05-01T12:00:00.000+09:00`)
//! - ISO 8601 with minute precision or a colon-less offset (`2024-05-01T12:00Z`,
//!   `2024-05-01T12:00:00+0900`)
//! - RFC 2822 (`Wed, 01 May 2024 12:00:00 GMT`)
//! - naive date-time (`2024-05-01T12:00:00`, `2024-05-01 12:00`), read as UTC
//! - bare date (`2024-05-01`), year-month (`2024-05`) or year (`2024`), read
//!   as UTC midnight on the first day of the period

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a publish timestamp. Returns `None` for anything unrecognised.
///
/// # Examples
/// ```
/// use vscore_models::timestamp::parse_published_at;
/// assert!(parse_published_at("2024-05-01T12:00:00Z").is_some());
/// assert!(parse_published_at("yesterday").is_none());
/// ```
pub fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_partial_date(raw))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `YYYY-MM` or `YYYY`, resolved to the first day of the period.
fn parse_partial_date(raw: &str) -> Option<NaiveDate> {
    let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());

    match raw.split_once('-') {
        Some((year, month)) if digits(year, 4) && digits(month, 2) => {
            NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
        }
        None if digits(raw, 4) => NaiveDate::from_ymd_opt(raw.parse().ok()?, 1, 1),
        _ => None,
    }
}
