//! File-backed store
//!
//! All persistent state lives as JSON documents under one application root:
//! the password file, the contest state file, and one `slot.json` per
//! (user, slot). Every mutating operation takes an advisory file lock for
//! exactly one file for the duration of its read-modify-write, then releases
//! it. The CLI tools follow the same discipline, which is what makes the
//! tree safe to share between the server and tool processes.

pub mod contest_state;
pub mod json_doc;
pub mod lock;
pub mod passwd;
pub mod secret;
pub mod slots;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub use lock::LockManager;

use crate::constants::{
    ADMINS_FILE_RELATIVE_PATH, INIT_PW_FILE_RELATIVE_PATH, INIT_STATE_FILE_RELATIVE_PATH,
    PW_FILE_RELATIVE_PATH, PW_LOCK_RELATIVE_PATH, PW_WORDS_RELATIVE_PATH,
    SECRET_FILE_RELATIVE_PATH, STATE_FILE_RELATIVE_PATH, STATE_LOCK_RELATIVE_PATH,
    USERS_DIR_RELATIVE_PATH,
};

/// Absolute locations of every store file, derived from the app root
#[derive(Debug, Clone)]
pub struct StorePaths {
    pub app_dir: PathBuf,
    pub pw_file: PathBuf,
    pub init_pw_file: PathBuf,
    pub pw_lock: PathBuf,
    pub state_file: PathBuf,
    pub init_state_file: PathBuf,
    pub state_lock: PathBuf,
    pub admins_file: PathBuf,
    pub secret_file: PathBuf,
    pub pw_words: PathBuf,
    pub users_dir: PathBuf,
}

impl StorePaths {
    pub fn new(app_dir: &Path) -> Self {
        Self {
            app_dir: app_dir.to_path_buf(),
            pw_file: app_dir.join(PW_FILE_RELATIVE_PATH),
            init_pw_file: app_dir.join(INIT_PW_FILE_RELATIVE_PATH),
            pw_lock: app_dir.join(PW_LOCK_RELATIVE_PATH),
            state_file: app_dir.join(STATE_FILE_RELATIVE_PATH),
            init_state_file: app_dir.join(INIT_STATE_FILE_RELATIVE_PATH),
            state_lock: app_dir.join(STATE_LOCK_RELATIVE_PATH),
            admins_file: app_dir.join(ADMINS_FILE_RELATIVE_PATH),
            secret_file: app_dir.join(SECRET_FILE_RELATIVE_PATH),
            pw_words: app_dir.join(PW_WORDS_RELATIVE_PATH),
            users_dir: app_dir.join(USERS_DIR_RELATIVE_PATH),
        }
    }
}

/// The shared store handle.
///
/// Owns the process's single [`LockManager`]; operations serialize on it so
/// that within this process at most one file is advisory-locked at a time.
/// Independent instances (each with their own root) are fully isolated, which
/// is what the tests rely on.
pub struct SubmitStore {
    paths: StorePaths,
    lock: Mutex<LockManager>,
}

impl SubmitStore {
    pub fn new(app_dir: &Path) -> Self {
        Self {
            paths: StorePaths::new(app_dir),
            lock: Mutex::new(LockManager::new()),
        }
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Take the process-wide lock manager for one operation's critical
    /// section. A poisoned mutex is recovered: the lock manager's own state
    /// is just "which file is locked", and a stale entry is force-released
    /// on the next acquire anyway.
    pub(crate) fn lock_manager(&self) -> MutexGuard<'_, LockManager> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::models::ContestState;

    pub const OPEN_DATE: &str = "2020-01-01 00:00:00.000000+00:00";
    pub const CLOSE_DATE: &str = "2099-12-31 23:59:59.999999+00:00";

    /// A fresh app root with seed templates in place, plus a store over it
    pub fn scratch_store() -> (TempDir, SubmitStore) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("etc")).unwrap();

        let store = SubmitStore::new(dir.path());
        fs::write(&store.paths().init_pw_file, "[]\n").unwrap();
        json_doc::write_document(
            &store.paths().init_state_file,
            &ContestState::new(OPEN_DATE, CLOSE_DATE),
        )
        .unwrap();
        (dir, store)
    }

    /// Provision a plain enabled account with an opaque hash
    pub fn add_account(store: &SubmitStore, username: &str, admin: bool) {
        store
            .upsert_account(username, "$argon2id$placeholder", admin, false, None, false)
            .unwrap();
    }
}
