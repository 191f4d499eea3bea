//! Admin request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::{
    MAX_PASSWORD_LENGTH, MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH,
};

/// Create account request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = MIN_USERNAME_LENGTH, max = MAX_USERNAME_LENGTH))]
    pub username: String,

    #[serde(default)]
    pub admin: bool,

    /// Initial password; generated when omitted
    #[validate(length(min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH))]
    pub password: Option<String>,
}

/// Update account access flags; omitted fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub admin: Option<bool>,
    pub disable_login: Option<bool>,
}

/// Set the contest open/close window
#[derive(Debug, Deserialize, Validate)]
pub struct SetContestWindowRequest {
    /// In the store's timestamp format, e.g. `2026-03-01 00:00:00.000000+00:00`
    #[validate(length(min = 1))]
    pub open_date: String,

    #[validate(length(min = 1))]
    pub close_date: String,
}

/// Set a slot's status string
#[derive(Debug, Deserialize, Validate)]
pub struct SetSlotStatusRequest {
    #[validate(length(min = 1, max = 256))]
    pub status: String,
}
