//! Admin handler implementations

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    error::AppResult,
    handlers::{
        auth::response::{MessageResponse, UserResponse},
        slots::response::SlotResponse,
    },
    services::AdminService,
    state::AppState,
    utils::time,
};

use super::{
    request::{CreateUserRequest, SetContestWindowRequest, SetSlotStatusRequest, UpdateUserRequest},
    response::{
        AdminUserResponse, ContestWindowResponse, CreateUserResponse, ResetPasswordResponse,
        UserListResponse,
    },
};

/// List every account
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<UserListResponse>> {
    let users = AdminService::list_users(state.store())?;
    Ok(Json(UserListResponse {
        users: users.into_iter().map(AdminUserResponse::from).collect(),
    }))
}

/// Create an account
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<CreateUserResponse>)> {
    payload.validate()?;

    let (account, initial_password) = AdminService::add_user(
        state.store(),
        &payload.username,
        payload.admin,
        payload.password.as_deref(),
    )?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            user: UserResponse::from(account),
            initial_password,
        }),
    ))
}

/// Update an account's access flags
pub async fn update_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<AdminUserResponse>> {
    payload.validate()?;

    let account = AdminService::update_user(
        state.store(),
        &username,
        payload.admin,
        payload.disable_login,
    )?;
    Ok(Json(AdminUserResponse::from(account)))
}

/// Reset an account's password to a generated one
pub async fn reset_password(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<ResetPasswordResponse>> {
    let password = AdminService::reset_password(state.store(), &username)?;
    Ok(Json(ResetPasswordResponse { username, password }))
}

/// Delete an account
pub async fn delete_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let removed = AdminService::delete_user(state.store(), &username)?;
    Ok(Json(MessageResponse {
        message: format!("Deleted user: {}", removed.username),
    }))
}

/// Read the contest window
pub async fn get_contest_window(
    State(state): State<AppState>,
) -> AppResult<Json<ContestWindowResponse>> {
    let (open, close) = state.store().read_state()?;
    Ok(Json(ContestWindowResponse {
        open_date: time::format_datetime(open),
        close_date: time::format_datetime(close),
    }))
}

/// Set the contest window
pub async fn set_contest_window(
    State(state): State<AppState>,
    Json(payload): Json<SetContestWindowRequest>,
) -> AppResult<Json<ContestWindowResponse>> {
    payload.validate()?;

    AdminService::set_contest_window(state.store(), &payload.open_date, &payload.close_date)?;
    let (open, close) = state.store().read_state()?;
    Ok(Json(ContestWindowResponse {
        open_date: time::format_datetime(open),
        close_date: time::format_datetime(close),
    }))
}

/// Rewrite the status string of one of a user's slots
pub async fn set_slot_status(
    State(state): State<AppState>,
    Path((username, slot_num)): Path<(String, u32)>,
    Json(payload): Json<SetSlotStatusRequest>,
) -> AppResult<Json<SlotResponse>> {
    payload.validate()?;

    state
        .store()
        .update_slot_status(&username, slot_num, &payload.status)?;
    let record = state.store().slot(&username, slot_num)?;
    Ok(Json(SlotResponse::from(record)))
}
