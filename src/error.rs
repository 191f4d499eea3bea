//! Custom error types and handling
//!
//! This module defines the application's error types and implements
//! conversion to HTTP responses for the Axum framework.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid slot number: {0}")]
    InvalidSlot(i64),

    // Resource errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    // Store errors
    #[error("Schema mismatch in {0}: stored document does not carry the expected format tags")]
    SchemaInvalid(String),

    #[error("Timed out waiting for lock on {0}")]
    LockTimeout(String),

    #[error("Store file {path} is not readable as JSON: {source}")]
    StoreUnreadable {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O failure on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // Contest window
    #[error("The contest is not open")]
    ContestClosed,

    // Internal errors
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// Build an [`AppError::Io`] tagged with the path that failed
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Build an [`AppError::StoreUnreadable`] tagged with the offending file
    pub fn unreadable(path: impl AsRef<std::path::Path>, source: serde_json::Error) -> Self {
        Self::StoreUnreadable {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::InvalidSlot(_) => "INVALID_SLOT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::SchemaInvalid(_) => "SCHEMA_INVALID",
            Self::LockTimeout(_) => "LOCK_TIMEOUT",
            Self::StoreUnreadable { .. } => "STORE_UNREADABLE",
            Self::Io { .. } => "IO_FAILURE",
            Self::ContestClosed => "CONTEST_CLOSED",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::InvalidToken | Self::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_)
            | Self::InvalidArgument(_)
            | Self::InvalidUsername(_)
            | Self::InvalidSlot(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyExists(_) => StatusCode::CONFLICT,
            Self::ContestClosed => StatusCode::FORBIDDEN,
            Self::LockTimeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::SchemaInvalid(_)
            | Self::StoreUnreadable { .. }
            | Self::Io { .. }
            | Self::Internal(_)
            | Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details in response
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal errors but don't expose details to clients
        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                "An internal error occurred".to_string()
            }
            AppError::Io { path, source } => {
                tracing::error!(path = %path, error = %source, "Store I/O failure");
                "A storage error occurred".to_string()
            }
            AppError::StoreUnreadable { path, source } => {
                tracing::error!(path = %path, error = %source, "Store file unreadable");
                "A storage error occurred".to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            error: ErrorDetails {
                code: self.error_code().to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
