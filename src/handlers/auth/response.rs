//! Authentication response DTOs

use serde::Serialize;

use crate::models::AccountRecord;

/// Authentication token response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

/// User information in auth responses
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub admin: bool,
    pub must_change_password: bool,
    pub password_change_deadline: Option<String>,
}

impl From<AccountRecord> for UserResponse {
    fn from(account: AccountRecord) -> Self {
        Self {
            username: account.username,
            admin: account.admin,
            must_change_password: account.force_pw_change,
            password_change_deadline: account.pw_change_by,
        }
    }
}

/// Current user response
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub user: UserResponse,
}

/// Simple confirmation message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
