//! Authentication handler implementations

use axum::{Json, extract::State};
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::AuthService,
    state::AppState,
};

use super::{
    request::{ChangePasswordRequest, LoginRequest},
    response::{AuthResponse, CurrentUserResponse, MessageResponse, UserResponse},
};

/// Login with username and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    payload.validate()?;

    let account = AuthService::login(state.store(), &payload.username, &payload.password)?;
    let (access_token, expires_in) = AuthService::generate_token(
        &account,
        state.session_secret(),
        state.config().session.expiry_hours,
    )?;

    Ok(Json(AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in,
        user: UserResponse::from(account),
    }))
}

/// Change the current user's password
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    payload.validate()?;

    AuthService::change_password(
        state.store(),
        &auth_user.username,
        &payload.old_password,
        &payload.new_password,
    )?;

    Ok(Json(MessageResponse {
        message: "Password updated".to_string(),
    }))
}

/// Get current authenticated user
pub async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<CurrentUserResponse>> {
    let account = state.store().lookup(&auth_user.username)?;

    Ok(Json(CurrentUserResponse {
        user: UserResponse::from(account),
    }))
}
