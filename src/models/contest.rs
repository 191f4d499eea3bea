//! Contest state model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{NO_COMMENT_VALUE, STATE_VERSION_VALUE},
    error::{AppError, AppResult},
    utils::time,
};

/// Singleton contest-window document stored as `etc/state.json`.
///
/// Both dates are strings in the one fixed timestamp format; they are parsed
/// on every read so a hand-edited file fails loudly instead of silently
/// reopening the contest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestState {
    pub no_comment: String,
    #[serde(rename = "state_JSON_format_version")]
    pub format_version: String,
    pub open_date: String,
    pub close_date: String,
}

impl ContestState {
    /// Build a state document with the current schema tags
    pub fn new(open_date: &str, close_date: &str) -> Self {
        Self {
            no_comment: NO_COMMENT_VALUE.to_string(),
            format_version: STATE_VERSION_VALUE.to_string(),
            open_date: open_date.to_string(),
            close_date: close_date.to_string(),
        }
    }

    /// Sanity check a document read back from the state file
    pub fn validate(&self) -> AppResult<()> {
        if self.no_comment != NO_COMMENT_VALUE || self.format_version != STATE_VERSION_VALUE {
            return Err(AppError::SchemaInvalid("contest state file".to_string()));
        }
        Ok(())
    }

    /// Parse the open date
    pub fn open(&self) -> AppResult<DateTime<Utc>> {
        time::parse_datetime(&self.open_date)
    }

    /// Parse the close date
    pub fn close(&self) -> AppResult<DateTime<Utc>> {
        time::parse_datetime(&self.close_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_parse() {
        let state = ContestState::new(
            "2026-01-01 00:00:00.000000+00:00",
            "2026-12-31 23:59:59.999999+00:00",
        );
        assert!(state.validate().is_ok());
        assert!(state.open().unwrap() < state.close().unwrap());

        let value = serde_json::to_value(&state).unwrap();
        assert!(value.get("state_JSON_format_version").is_some());
        let back: ContestState = serde_json::from_value(value).unwrap();
        assert_eq!(back.open_date, state.open_date);
    }

    #[test]
    fn test_validate_rejects_bad_tags() {
        let mut state = ContestState::new(
            "2026-01-01 00:00:00.000000+00:00",
            "2026-12-31 23:59:59.999999+00:00",
        );
        state.format_version = "0.0 2000-01-01".to_string();
        assert!(matches!(state.validate(), Err(AppError::SchemaInvalid(_))));
    }

    #[test]
    fn test_unparseable_dates_fail() {
        let state = ContestState::new("soon", "later");
        assert!(state.open().is_err());
        assert!(state.close().is_err());
    }
}
