//! Slot handler implementations

use axum::{
    Json,
    extract::{Multipart, Path, State},
};

use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    services::SubmissionService,
    state::AppState,
    utils::time,
};

use super::response::{SlotListResponse, SlotResponse, UploadResponse};

/// List every slot for the current user, initializing the tree if needed
pub async fn list_slots(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<SlotListResponse>> {
    let slots = state.store().all_slots(&auth_user.username)?;
    Ok(Json(SlotListResponse {
        slots: slots.into_iter().map(SlotResponse::from).collect(),
    }))
}

/// Read one slot for the current user
pub async fn get_slot(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(slot_num): Path<u32>,
) -> AppResult<Json<SlotResponse>> {
    let record = state.store().slot(&auth_user.username, slot_num)?;
    Ok(Json(SlotResponse::from(record)))
}

/// Upload a submission tarball into one of the current user's slots.
///
/// Refused while the user is required to change their password, and outside
/// the contest window (admins are always inside it).
pub async fn upload(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(slot_num): Path<u32>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let account = state.store().lookup(&auth_user.username)?;

    if account.force_pw_change {
        return Err(AppError::Forbidden(
            "user is required to change their password".to_string(),
        ));
    }

    let close_date = state
        .store()
        .contest_is_open(&account)?
        .ok_or(AppError::ContestClosed)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .ok_or_else(|| AppError::Validation("no file selected".to_string()))?
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
            upload = Some((filename, data));
            break;
        }
    }
    let (filename, data) =
        upload.ok_or_else(|| AppError::Validation("no file part in request".to_string()))?;

    let record = SubmissionService::accept_upload(
        state.store(),
        &auth_user.username,
        slot_num,
        &filename,
        &data,
    )?;

    Ok(Json(UploadResponse {
        message: format!("Uploaded file: {filename}"),
        close_date: time::format_datetime(close_date),
        slot: SlotResponse::from(record),
    }))
}
