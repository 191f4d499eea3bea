//! Account record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{NO_COMMENT_VALUE, PASSWORD_VERSION_VALUE},
    error::{AppError, AppResult},
    utils::{time, validation},
};

/// One entry in the password store.
///
/// The `no_comment` and format version fields are fixed schema tags; a stored
/// record whose tags differ from the current constants is treated as
/// corruption, never auto-repaired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub no_comment: String,
    #[serde(rename = "iocccpasswd_format_version")]
    pub format_version: String,
    pub username: String,
    pub pwhash: String,
    pub admin: bool,
    pub force_pw_change: bool,
    pub pw_change_by: Option<String>,
    pub disable_login: bool,
}

impl AccountRecord {
    /// Build a new record with the current schema tags
    pub fn new(
        username: &str,
        pwhash: &str,
        admin: bool,
        force_pw_change: bool,
        pw_change_by: Option<String>,
        disable_login: bool,
    ) -> Self {
        Self {
            no_comment: NO_COMMENT_VALUE.to_string(),
            format_version: PASSWORD_VERSION_VALUE.to_string(),
            username: username.to_string(),
            pwhash: pwhash.to_string(),
            admin,
            force_pw_change,
            pw_change_by,
            disable_login,
        }
    }

    /// Sanity check a record read back from the password store
    pub fn validate(&self) -> AppResult<()> {
        if self.no_comment != NO_COMMENT_VALUE || self.format_version != PASSWORD_VERSION_VALUE {
            return Err(AppError::SchemaInvalid(format!(
                "account record for <<{}>>",
                self.username
            )));
        }
        validation::validate_username(&self.username)?;
        Ok(())
    }

    /// Determine whether this account may log in at the given instant.
    ///
    /// Login is denied when the account is disabled, or when a forced
    /// password change has a deadline and `now` is past it. A deadline that
    /// fails to parse also denies login.
    pub fn login_allowed_at(&self, now: DateTime<Utc>) -> bool {
        if self.disable_login {
            tracing::info!(username = %self.username, "login disabled");
            return false;
        }
        if self.force_pw_change {
            if let Some(deadline) = &self.pw_change_by {
                match time::parse_datetime(deadline) {
                    Ok(deadline) => {
                        if now > deadline {
                            tracing::info!(
                                username = %self.username,
                                "password not changed in time"
                            );
                            return false;
                        }
                    }
                    Err(err) => {
                        tracing::error!(
                            username = %self.username,
                            error = %err,
                            "unparseable pw_change_by deadline"
                        );
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Determine whether this account may log in right now
    pub fn login_allowed(&self) -> bool {
        self.login_allowed_at(Utc::now())
    }
}
