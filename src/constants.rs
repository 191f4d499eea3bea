//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8191;

/// Default application root directory (holds `etc/` and `users/`)
pub const DEFAULT_APP_DIR: &str = "/var/submitd";

// =============================================================================
// ON-DISK LAYOUT (relative to the application root)
// =============================================================================

/// Password store
pub const PW_FILE_RELATIVE_PATH: &str = "etc/iocccpasswd.json";

/// Seed template for the password store
pub const INIT_PW_FILE_RELATIVE_PATH: &str = "etc/init.iocccpasswd.json";

/// Lock file guarding the password store
pub const PW_LOCK_RELATIVE_PATH: &str = "etc/iocccpasswd.lock";

/// Contest state file
pub const STATE_FILE_RELATIVE_PATH: &str = "etc/state.json";

/// Seed template for the contest state file
pub const INIT_STATE_FILE_RELATIVE_PATH: &str = "etc/init.state.json";

/// Lock file guarding the contest state file
pub const STATE_LOCK_RELATIVE_PATH: &str = "etc/state.lock";

/// Admin username allowlist (read-only to this server)
pub const ADMINS_FILE_RELATIVE_PATH: &str = "etc/admins.json";

/// Opaque server secret used to sign web sessions
pub const SECRET_FILE_RELATIVE_PATH: &str = "etc/.secret";

/// Word list used when generating initial passwords
pub const PW_WORDS_RELATIVE_PATH: &str = "etc/pw.words";

/// Per-user slot trees live under this directory
pub const USERS_DIR_RELATIVE_PATH: &str = "users";

/// JSON metadata filename inside each slot directory
pub const SLOT_JSON_FILENAME: &str = "slot.json";

/// Lock filename inside each slot directory
pub const SLOT_LOCK_FILENAME: &str = "lock";

// =============================================================================
// JSON SCHEMA TAGS
// =============================================================================

/// Fixed comment tag carried by every JSON document; a mismatch is corruption
pub const NO_COMMENT_VALUE: &str =
    "mandatory comment: because comments were removed from the original JSON spec";

/// Slot record format version
pub const SLOT_VERSION_VALUE: &str = "1.1 2024-10-13";

/// Account record format version
pub const PASSWORD_VERSION_VALUE: &str = "1.1 2024-10-18";

/// Contest state format version
pub const STATE_VERSION_VALUE: &str = "1.1 2024-10-27";

// =============================================================================
// USERNAME AND PASSWORD RULES
// =============================================================================

/// POSIX safe filename pattern every username must match
pub const POSIX_SAFE_RE: &str = "^[0-9A-Za-z][0-9A-Za-z._+-]*$";

/// Username minimum length
pub const MIN_USERNAME_LENGTH: u64 = 1;

/// Username maximum length
pub const MAX_USERNAME_LENGTH: u64 = 40;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: u64 = 15;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: u64 = 40;

/// Grace period granted for a forced password change, in seconds
pub const DEFAULT_GRACE_PERIOD_SECS: i64 = 72 * 3600;

/// Minimum length of the server secret before the fallback generator kicks in
pub const MIN_SECRET_LEN: usize = 15;

/// Length of a generated fallback server secret
pub const GENERATED_SECRET_LEN: usize = 64;

// =============================================================================
// SLOTS AND UPLOADS
// =============================================================================

/// Slot numbers run from 0 to MAX_SUBMIT_SLOT inclusive
pub const MAX_SUBMIT_SLOT: u32 = 9;

/// Number of slots per user
pub const SLOT_COUNT: usize = (MAX_SUBMIT_SLOT + 1) as usize;

/// Compressed tarball size limit in bytes
pub const MAX_TARBALL_LEN: u64 = 3_999_971;

/// Status string written into a freshly initialized slot record
pub const EMPTY_SLOT_STATUS: &str = "slot is empty";

/// Status string written by a successful upload
pub const UPLOADED_SLOT_STATUS: &str = "Uploaded file into slot";

/// Length of a SHA-256 digest in ASCII hex characters
pub const SHA256_HEXLEN: usize = 64;

// =============================================================================
// LOCKING
// =============================================================================

/// Bounded wait for an advisory file lock, in seconds
pub const LOCK_TIMEOUT_SECS: u64 = 13;

/// Poll interval while waiting for a contended advisory lock, in milliseconds
pub const LOCK_POLL_INTERVAL_MS: u64 = 100;

// =============================================================================
// TIMESTAMPS
// =============================================================================

/// The one fixed timestamp format used by the password and state files,
/// e.g. `2024-10-27 00:00:00.000000+00:00`
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f%:z";

/// Format of the upload timestamp stored in a slot record, truncated to
/// whole seconds, e.g. `2024-10-27 12:34:56 UTC`
pub const SLOT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default JWT token expiry in hours
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";
