//! Admin response DTOs

use serde::Serialize;

use crate::{handlers::auth::response::UserResponse, models::AccountRecord};

/// Full account view for administrators (hash omitted)
#[derive(Debug, Serialize)]
pub struct AdminUserResponse {
    pub username: String,
    pub admin: bool,
    pub force_pw_change: bool,
    pub pw_change_by: Option<String>,
    pub disable_login: bool,
}

impl From<AccountRecord> for AdminUserResponse {
    fn from(account: AccountRecord) -> Self {
        Self {
            username: account.username,
            admin: account.admin,
            force_pw_change: account.force_pw_change,
            pw_change_by: account.pw_change_by,
            disable_login: account.disable_login,
        }
    }
}

/// All accounts
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<AdminUserResponse>,
}

/// Account creation response, carrying the initial password exactly once
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub user: UserResponse,
    pub initial_password: String,
}

/// New password after an administrative reset
#[derive(Debug, Serialize)]
pub struct ResetPasswordResponse {
    pub username: String,
    pub password: String,
}

/// The contest window
#[derive(Debug, Serialize)]
pub struct ContestWindowResponse {
    pub open_date: String,
    pub close_date: String,
}
