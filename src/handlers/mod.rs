//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod admin;
pub mod auth;
pub mod health;
pub mod slots;

use axum::Router;

use crate::state::AppState;

/// Create all API routes.
///
/// The state is taken here (and not only via `with_state`) because the auth
/// and admin middleware need it at router-construction time.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/auth", auth::routes(state.clone()))
        .nest("/slots", slots::routes(state.clone()))
        .nest("/admin", admin::routes(state))
}
