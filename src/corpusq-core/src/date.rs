//! Lenient date parsing for publication dates
//!
//! Source files come from many hands, so a handful of common shapes are
//! accepted. Anything else is reported as unparseable and becomes null.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use corpusq_shared::Value;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];

const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%d %b %Y",
];

/// Parse a cell into a date. Nulls and blanks yield `None` without counting
/// as a failure; callers distinguish the two with [`is_missing`].
#[must_use]
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Int(i) => year_start(*i),
        Value::Float(_) => value.as_i64().and_then(year_start),
        Value::String(s) => parse_date_str(s),
        Value::Null | Value::Bool(_) => None,
    }
}

/// Whether a cell carries no date at all (as opposed to a malformed one)
#[must_use]
pub fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Parse a date string in any of the accepted shapes
#[must_use]
pub fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    // Year-month and bare year pin to the first day of the period.
    if let Some((year, month)) = s.split_once('-') {
        if year.len() == 4 && (1..=2).contains(&month.len()) {
            let year = year.parse().ok()?;
            let month = month.parse().ok()?;
            return NaiveDate::from_ymd_opt(year, month, 1);
        }
    }

    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().ok().and_then(year_start);
    }

    None
}

fn year_start(year: i64) -> Option<NaiveDate> {
    if !(1000..=9999).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, 1, 1)
}
