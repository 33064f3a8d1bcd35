//! Cell-level parsing of numbers and dates.
//!
//! Extracts arrive as text. Two numeric conventions coexist: scraped tables
//! use the Brazilian locale (`1.234,56`, `R$ 9,80`, `0,85%`) while machine
//! written files use plain dot decimals. Unparsable cells become `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Brazilian day-first date format used by the distributions table.
pub const BR_DATE_FORMAT: &str = "%d/%m/%Y";

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const OFFSET_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"];

/// Characters that decorate numbers but carry no value.
fn strip_decorations(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches("R$")
        .trim_end_matches('%')
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{a0}')
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Parse a locale-formatted number.
///
/// Every `.` is a thousands separator and `,` is the decimal mark, so
/// `"1.234,56"` is `1234.56` and `"R$ 9,80"` is `9.8`.
pub fn parse_locale_number(raw: &str) -> Option<f64> {
    let cleaned: String = strip_decorations(raw)
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().and_then(finite)
}

/// Parse a plain dot-decimal number (`"10.5"`, `"-3e2"`).
pub fn parse_plain_number(raw: &str) -> Option<f64> {
    let cleaned = strip_decorations(raw);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().and_then(finite)
}

/// Parse a `dd/mm/YYYY` date.
pub fn parse_br_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), BR_DATE_FORMAT).ok()
}

/// Parse a timestamp into a naive date-time.
///
/// Accepts RFC 3339 and `YYYY-mm-dd HH:MM:SS[.f][±hh:mm]` (values with an
/// offset are converted to UTC), naive date-times, and bare ISO dates (taken
/// at midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.naive_utc());
        }
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Parse an ISO date, date-time, or offset date-time and keep the (UTC) day.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|dt| dt.date())
}
