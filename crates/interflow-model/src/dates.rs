//! Lenient date parsing shared by need decoding, sorting and reconciliation.
//!
//! Backend payloads mix RFC 3339 timestamps, naive ISO timestamps and plain
//! dates. Everything is reduced to a naive local instant: an explicit offset
//! is dropped after conversion to its own wall-clock time.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Parse a timestamp or a date into a naive instant.
///
/// Returns `None` when no known format matches.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parse a value and keep only its calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_datetime(value).map(|dt| dt.date())
}

/// Format an instant as a naive ISO 8601 timestamp (`YYYY-MM-DDTHH:MM:SS`).
pub fn format_iso(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_as_wall_clock() {
        let dt = parse_datetime("2024-06-01T08:30:00+02:00").unwrap();
        assert_eq!(format_iso(&dt), "2024-06-01T08:30:00");
    }

    #[test]
    fn parses_zulu_timestamp() {
        assert_eq!(
            parse_date("2024-06-01T00:00:00Z"),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
    }

    #[test]
    fn parses_plain_and_french_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_date("2024-03-09"), expected);
        assert_eq!(parse_date("09/03/2024"), expected);
        assert_eq!(parse_date("2024-03-09 14:00:00"), expected);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_datetime("").is_none());
        assert!(parse_datetime("soon").is_none());
    }
}
