use chrono::NaiveDateTime;
use tracing::debug;

/// Layouts seen in the trip exports, most common first.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a trip start timestamp as a naive local datetime.
///
/// The exports carry no offset; times are taken as wall-clock in the city's
/// own timezone. Returns `None` for empty strings or unrecognised layouts.
pub fn parse_trip_timestamp(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    for fmt in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }

    debug!("could not parse timestamp \"{}\"", trimmed);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_space_separated() {
        let dt = parse_trip_timestamp("2017-01-01 09:07:57").unwrap();
        assert_eq!(dt.year(), 2017);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.hour(), 9);
        assert_eq!(dt.second(), 57);
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let dt = parse_trip_timestamp("2017-06-30 23:59:59.500").unwrap();
        assert_eq!(dt.hour(), 23);
        assert_eq!(dt.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_parse_iso_t_separator() {
        let dt = parse_trip_timestamp("2017-03-15T14:00:00").unwrap();
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 14);
    }

    #[test]
    fn test_parse_without_seconds() {
        let dt = parse_trip_timestamp("2017-05-02 07:45").unwrap();
        assert_eq!(dt.minute(), 45);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert!(parse_trip_timestamp("  2017-01-01 00:00:00 ").is_some());
    }

    #[test]
    fn test_parse_empty_returns_none() {
        assert!(parse_trip_timestamp("").is_none());
        assert!(parse_trip_timestamp("   ").is_none());
    }

    #[test]
    fn test_parse_garbage_returns_none() {
        assert!(parse_trip_timestamp("not-a-date").is_none());
        assert!(parse_trip_timestamp("2017-13-01 00:00:00").is_none());
    }
}
