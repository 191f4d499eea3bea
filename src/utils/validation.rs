//! Input validation utilities

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    constants::{
        MAX_PASSWORD_LENGTH, MAX_SUBMIT_SLOT, MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH,
        MIN_USERNAME_LENGTH, POSIX_SAFE_RE,
    },
    error::{AppError, AppResult},
};

static POSIX_SAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(POSIX_SAFE_RE).expect("POSIX_SAFE_RE must compile"));

/// Validate a username: length bounds plus the POSIX safe filename pattern.
///
/// The pattern rejects `/` and empty strings, so a username can never be used
/// to escape the `users/` directory.
pub fn validate_username(username: &str) -> AppResult<()> {
    if (username.len() as u64) < MIN_USERNAME_LENGTH {
        return Err(AppError::InvalidUsername(format!(
            "too short: {} < {}",
            username.len(),
            MIN_USERNAME_LENGTH
        )));
    }
    if (username.len() as u64) > MAX_USERNAME_LENGTH {
        return Err(AppError::InvalidUsername(format!(
            "too long: {} > {}",
            username.len(),
            MAX_USERNAME_LENGTH
        )));
    }
    if !POSIX_SAFE.is_match(username) {
        return Err(AppError::InvalidUsername(
            "not a POSIX safe filename".to_string(),
        ));
    }
    Ok(())
}

/// Validate a slot number against the fixed slot range
pub fn validate_slot_num(slot_num: u32) -> AppResult<()> {
    if slot_num > MAX_SUBMIT_SLOT {
        return Err(AppError::InvalidSlot(i64::from(slot_num)));
    }
    Ok(())
}

/// Validate password length rules
pub fn validate_password(password: &str) -> AppResult<()> {
    if (password.len() as u64) < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if (password.len() as u64) > MAX_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Build the regular expression an uploaded filename must match for a given
/// user and slot: `submit.<username>-<slot>.<10+ digit timestamp>.txz`
pub fn upload_filename_re(username: &str, slot_num: u32) -> AppResult<Regex> {
    validate_username(username)?;
    validate_slot_num(slot_num)?;
    let pattern = format!(
        "^submit\\.{}-{}\\.[1-9][0-9]{{9,}}\\.txz$",
        regex::escape(username),
        slot_num
    );
    Regex::new(&pattern)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("upload filename pattern: {e}")))
}

/// Validate an uploaded filename against the submit file contract
pub fn validate_upload_filename(username: &str, slot_num: u32, filename: &str) -> AppResult<()> {
    let re = upload_filename_re(username, slot_num)?;
    if !re.is_match(filename) {
        return Err(AppError::Validation(format!(
            "filename for slot {slot_num} must match: {}",
            re.as_str()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("12345678-1234-4321-8765-123456789abc").is_ok());
        assert!(validate_username("a.b_c+d-e").is_ok());
        assert!(validate_username("").is_err()); // Too short
        assert!(validate_username(&"x".repeat(41)).is_err()); // Too long
        assert!(validate_username(".hidden").is_err()); // Bad leading character
        assert!(validate_username("who/what").is_err()); // Path separator
        assert!(validate_username("tab\tname").is_err());
    }

    #[test]
    fn test_validate_slot_num() {
        assert!(validate_slot_num(0).is_ok());
        assert!(validate_slot_num(9).is_ok());
        assert!(validate_slot_num(10).is_err());
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("exactly-15-char").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(41)).is_err());
    }

    #[test]
    fn test_upload_filename_contract() {
        assert!(validate_upload_filename("alice", 3, "submit.alice-3.1700000000.txz").is_ok());
        assert!(validate_upload_filename("alice", 3, "submit.alice-3.17000000001.txz").is_ok());
        // wrong slot
        assert!(validate_upload_filename("alice", 4, "submit.alice-3.1700000000.txz").is_err());
        // wrong user
        assert!(validate_upload_filename("bob", 3, "submit.alice-3.1700000000.txz").is_err());
        // timestamp too short
        assert!(validate_upload_filename("alice", 3, "submit.alice-3.123.txz").is_err());
        // leading zero timestamp
        assert!(validate_upload_filename("alice", 3, "submit.alice-3.0700000000.txz").is_err());
        // wrong extension
        assert!(validate_upload_filename("alice", 3, "submit.alice-3.1700000000.tgz").is_err());
    }

    #[test]
    fn test_upload_filename_escapes_username() {
        // A username containing '.' must match literally, not as a wildcard
        assert!(validate_upload_filename("a.b", 0, "submit.a.b-0.1700000000.txz").is_ok());
        assert!(validate_upload_filename("a.b", 0, "submit.aXb-0.1700000000.txz").is_err());
    }
}
