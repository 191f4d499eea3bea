//! Time utilities

use chrono::{DateTime, Utc};

use crate::{
    constants::{DATETIME_FORMAT, SLOT_DATE_FORMAT},
    error::{AppError, AppResult},
};

/// Get current UTC time
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Parse a timestamp in the store's fixed format,
/// e.g. `2024-10-27 00:00:00.000000+00:00`
pub fn parse_datetime(s: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_str(s, DATETIME_FORMAT)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Validation(format!("not in datetime format: <<{s}>>: {e}")))
}

/// Format a timestamp in the store's fixed format
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Format an upload timestamp for a slot record, truncated to whole seconds
pub fn slot_timestamp(dt: DateTime<Utc>) -> String {
    dt.format(SLOT_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime() {
        let dt = parse_datetime("2024-10-27 00:00:00.000000+00:00").unwrap();
        assert_eq!(dt.timestamp(), 1_729_987_200);

        assert!(parse_datetime("not a date").is_err());
        assert!(parse_datetime("2024-10-27T00:00:00Z").is_err()); // wrong format
    }

    #[test]
    fn test_format_round_trip() {
        let dt = parse_datetime("2025-03-01 12:34:56.789012+00:00").unwrap();
        assert_eq!(format_datetime(dt), "2025-03-01 12:34:56.789012+00:00");
        assert_eq!(parse_datetime(&format_datetime(dt)).unwrap(), dt);
    }

    #[test]
    fn test_parse_nonzero_offset() {
        let dt = parse_datetime("2025-03-01 12:00:00.000000+02:00").unwrap();
        // normalized to UTC
        assert_eq!(format_datetime(dt), "2025-03-01 10:00:00.000000+00:00");
    }

    #[test]
    fn test_slot_timestamp_truncates_to_seconds() {
        let dt = parse_datetime("2025-03-01 12:34:56.789012+00:00").unwrap();
        assert_eq!(slot_timestamp(dt), "2025-03-01 12:34:56 UTC");
    }
}
