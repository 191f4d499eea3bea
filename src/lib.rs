//! submitd - Contest Submission Server
//!
//! This library provides the core functionality for the submitd platform,
//! a contest submission server where authenticated users upload tarballs
//! into a fixed set of numbered slots.
//!
//! # Features
//!
//! - Per-user slot trees with lazily initialized JSON metadata
//! - Advisory file locking shared with the CLI tools
//! - Self-healing seed-from-template stores (password file, contest state)
//! - Account management with forced password-change deadlines
//! - Contest open/close window enforcement
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic
//! - **Store**: Lock-guarded JSON file persistence
//! - **Models**: Domain records and DTOs

pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
pub use store::SubmitStore;
