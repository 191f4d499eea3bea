//! Slot handlers

mod handler;
pub mod response;

pub use handler::*;
pub use response::*;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};

use crate::{constants::MAX_TARBALL_LEN, middleware::auth::auth_middleware, state::AppState};

/// Slot routes (authenticated)
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_slots))
        .route("/{slot_num}", get(handler::get_slot))
        .route("/{slot_num}/upload", post(handler::upload))
        // leave headroom above the tarball limit for multipart framing
        .layer(DefaultBodyLimit::max((MAX_TARBALL_LEN as usize) + 64 * 1024))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
