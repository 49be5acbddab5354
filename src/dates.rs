//! Best-effort calendar date parsing for sheet cells, plus month bucketing.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::fmt;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a date cell. Returns `None` for blanks and anything unrecognized.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for f in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, f) {
            return Some(d);
        }
    }
    for f in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, f) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    None
}

/// Calendar month bucket; orders chronologically and renders as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_common_sheet_formats() {
        assert_eq!(parse_date("2024-01-05"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date(" 2024/01/05 "), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("01/05/2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("05.01.2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("Jan 5, 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("January 5, 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("5 Jan 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05 13:45:00"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T13:45:00Z"), Some(ymd(2024, 1, 5)));
        assert_eq!(
            parse_date("Fri, 05 Jan 2024 13:45:00 +0000"),
            Some(ymd(2024, 1, 5))
        );
    }

    #[test]
    fn rejects_garbage_and_blanks() {
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn month_buckets() {
        let a = YearMonth::of(ymd(2024, 3, 15));
        let b = YearMonth::of(ymd(2024, 3, 1));
        let c = YearMonth::of(ymd(2024, 4, 1));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a < c);
        assert!(YearMonth::of(ymd(2023, 12, 31)) < b);
        assert_eq!(a.to_string(), "2024-03");
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"2024-04\"");
    }
}
