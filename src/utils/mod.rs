//! Utility functions

pub mod crypto;
pub mod time;
pub mod validation;

pub use crypto::{generate_secure_token, sha256_bytes, sha256_file};
pub use time::{format_datetime, now_utc, parse_datetime};
pub use validation::{validate_slot_num, validate_username};
