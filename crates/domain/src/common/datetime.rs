//! DateTime helpers for timestamps stored as text.

use chrono::{DateTime, SecondsFormat, Utc};

/// Parses an RFC3339 timestamp string, returning an error if parsing fails.
///
/// # Examples
///
/// ```
/// use roster_domain::common::parse_datetime;
/// use chrono::Datelike;
///
/// let dt = parse_datetime("2024-01-15T10:30:00Z").unwrap();
/// assert_eq!(dt.year(), 2024);
/// ```
///
/// # Errors
///
/// Returns `chrono::ParseError` if the string is not valid RFC3339.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

/// Formats a timestamp the way every text-backed store persists it
/// (RFC3339, millisecond precision, `Z` suffix).
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_parse_datetime_valid() {
        let dt = parse_datetime("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_datetime_with_timezone() {
        let dt = parse_datetime("2024-01-15T10:30:00+05:00").unwrap();
        // Should be converted to UTC
        assert_eq!(dt.hour(), 5);
    }

    #[test]
    fn test_parse_datetime_invalid() {
        assert!(parse_datetime("not-a-date").is_err());
        assert!(parse_datetime("").is_err());
        assert!(parse_datetime("2024-01-15").is_err());
    }

    #[test]
    fn test_format_round_trips_through_parse() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 9, 8, 7, 6).unwrap();
        let text = format_datetime(dt);
        assert_eq!(text, "2024-03-09T08:07:06.000Z");
        assert_eq!(parse_datetime(&text).unwrap(), dt);
    }
}
