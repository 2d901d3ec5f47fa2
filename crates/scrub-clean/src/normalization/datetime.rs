//! Lenient date/time parsing.
//!
//! Accepts the formats commonly found in exported spreadsheets and logs.
//! Ambiguous slash dates are read month-first (`03/04/2024` is March 4th);
//! day-first is only used when month-first cannot be valid.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d-%b-%Y %H:%M:%S",
    "%d-%b-%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y-%b-%d",
];

/// Parse a date or date/time string.
///
/// Returns `None` for empty input, for anything that reads as a plain
/// number, and for unrecognized formats. Offsets in RFC 3339 input are
/// normalized to UTC.
///
/// # Examples
///
/// ```
/// use scrub_clean::normalization::datetime::parse_datetime;
///
/// assert!(parse_datetime("2024-01-15").is_some());
/// assert!(parse_datetime("15-Jan-2024 10:30").is_some());
/// assert!(parse_datetime("20240115").is_none());
/// ```
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.parse::<f64>().is_ok() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    try_parse_datetime(trimmed)
        .or_else(|| try_parse_date(trimmed).map(|d| d.and_time(NaiveTime::MIN)))
        .or_else(|| try_parse_year_month(trimmed).map(|d| d.and_time(NaiveTime::MIN)))
}

/// Milliseconds since the Unix epoch.
pub fn to_timestamp_ms(value: NaiveDateTime) -> i64 {
    value.and_utc().timestamp_millis()
}

fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn try_parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// `2024-03`, `2024/03`, `Mar 2024`, `March 2024`: first day of the month.
fn try_parse_year_month(value: &str) -> Option<NaiveDate> {
    let has_full_year = value.len() >= 6 && value.chars().take(4).all(|c| c.is_ascii_digit());
    if has_full_year {
        let numeric = value.replace('/', "-");
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{numeric}-01"), "%Y-%m-%d") {
            return Some(date);
        }
    }
    let named = format!("01 {value}");
    NaiveDate::parse_from_str(&named, "%d %b %Y")
        .or_else(|_| NaiveDate::parse_from_str(&named, "%d %B %Y"))
        .ok()
}
