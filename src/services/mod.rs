//! Business logic services

pub mod admin_service;
pub mod auth_service;
pub mod submission_service;

pub use admin_service::AdminService;
pub use auth_service::AuthService;
pub use submission_service::SubmissionService;
