//! Authentication middleware

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::AppError,
    services::{AdminService, AuthService},
    state::AppState,
};

/// Authenticated user extracted from the bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub username: String,
    pub admin: bool,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let Some(auth_header) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        debug!(path = %path, "Auth failed: No Authorization header");
        return Err(AppError::Unauthorized);
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        debug!(path = %path, "Auth failed: expected 'Bearer <token>'");
        return Err(AppError::Unauthorized);
    };

    let claims = AuthService::verify_token(token, state.session_secret()).map_err(|e| {
        debug!(path = %path, error = ?e, "Auth failed: token verification failed");
        e
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        username: claims.sub,
        admin: claims.admin,
    });
    Ok(next.run(request).await)
}

/// Admin gate middleware; must run after `auth_middleware`.
///
/// Re-reads the account so a just-revoked admin flag takes effect
/// immediately, then consults the allowlist file as well.
pub async fn require_admin(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let account = state.store().lookup(&user.username)?;
    if !AdminService::is_admin(state.store(), &account) {
        debug!(username = %user.username, "admin access denied");
        return Err(AppError::Forbidden("admin access required".to_string()));
    }
    Ok(next.run(request).await)
}
