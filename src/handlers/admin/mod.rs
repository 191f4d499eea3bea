//! Admin management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post, put},
};

use crate::{
    middleware::auth::{auth_middleware, require_admin},
    state::AppState,
};

/// Admin routes (authenticated + admin gate)
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users", get(handler::list_users))
        .route("/users", post(handler::create_user))
        .route("/users/{username}", patch(handler::update_user))
        .route("/users/{username}", delete(handler::delete_user))
        .route(
            "/users/{username}/reset-password",
            post(handler::reset_password),
        )
        .route(
            "/users/{username}/slots/{slot_num}/status",
            put(handler::set_slot_status),
        )
        .route("/state", get(handler::get_contest_window))
        .route("/state", put(handler::set_contest_window))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
