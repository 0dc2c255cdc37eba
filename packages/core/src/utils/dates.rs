//! ISO-8601 date helpers
//!
//! Node dates are stored as strings. They are parsed strictly against the
//! ISO-8601 shapes below when a route needs `year`, `month` or `day`, and
//! the same parser backs the default date recognition used by type inference.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Date-time layouts accepted in addition to RFC 3339.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Date-only layout (`2024-03-05`).
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO-8601 date or date-time into UTC.
///
/// Values with an offset are converted to UTC; values without one are
/// interpreted as UTC.
///
/// ```
/// use contentgraph_core::utils::parse_iso_date;
///
/// assert!(parse_iso_date("2024-03-05").is_some());
/// assert!(parse_iso_date("2024-03-05T10:00:00+02:00").is_some());
/// assert!(parse_iso_date("March 5th").is_none());
/// ```
pub fn parse_iso_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Default date recognition predicate: ISO-8601 strings only.
pub fn is_date(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| parse_iso_date(s).is_some())
}

/// Current time as an ISO-8601 UTC string with millisecond precision.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format the `year`, `month` or `day` unit of a date; `None` for other names.
pub fn format_date_part(name: &str, date: &DateTime<Utc>) -> Option<String> {
    let format = match name {
        "year" => "%Y",
        "month" => "%m",
        "day" => "%d",
        _ => return None,
    };
    Some(date.format(format).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use serde_json::json;

    #[test]
    fn test_parse_date_only() {
        let date = parse_iso_date("2024-03-05").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 5));
    }

    #[test]
    fn test_parse_rfc3339_converts_to_utc() {
        let date = parse_iso_date("2024-03-05T23:30:00-05:00").unwrap();
        assert_eq!(date.day(), 6);
    }

    #[test]
    fn test_parse_naive_date_time() {
        assert!(parse_iso_date("2024-03-05T10:15:00").is_some());
        assert!(parse_iso_date("2024-03-05T10:15").is_some());
        assert!(parse_iso_date("2024-03-05 10:15:00").is_some());
    }

    #[test]
    fn test_rejects_invalid_dates() {
        assert!(parse_iso_date("2024-13-45").is_none());
        assert!(parse_iso_date("yesterday").is_none());
        assert!(parse_iso_date("").is_none());
    }

    #[test]
    fn test_is_date_only_matches_strings() {
        assert!(is_date(&json!("2024-01-01")));
        assert!(!is_date(&json!(20240101)));
        assert!(!is_date(&json!("hello")));
        assert!(!is_date(&json!(null)));
    }

    #[test]
    fn test_now_iso_round_trips() {
        assert!(parse_iso_date(&now_iso()).is_some());
    }

    #[test]
    fn test_format_date_part() {
        let date = parse_iso_date("2024-03-05").unwrap();
        assert_eq!(format_date_part("year", &date).as_deref(), Some("2024"));
        assert_eq!(format_date_part("month", &date).as_deref(), Some("03"));
        assert_eq!(format_date_part("day", &date).as_deref(), Some("05"));
        assert_eq!(format_date_part("slug", &date), None);
    }
}
