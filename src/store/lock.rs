//! Advisory file lock manager
//!
//! One process-wide lock discipline: at most one file is advisory-locked at a
//! time, every critical section is "acquire, read, mutate, write, release",
//! and acquiring while another lock is still held forcibly releases the old
//! one. The server itself is effectively single-threaded; the locks exist
//! because the CLI tools run as separate processes against the same tree.

use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::{
    constants::{LOCK_POLL_INTERVAL_MS, LOCK_TIMEOUT_SECS},
    error::{AppError, AppResult},
};

/// The one lock currently held, if any
struct HeldLock {
    file: File,
    path: PathBuf,
}

/// Serializes access to the on-disk JSON stores via OS advisory locks.
///
/// Not reentrant by construction: a second `acquire` while a lock is held
/// steals the lock (with a warning) rather than nesting. Callers must release
/// before control returns to them.
pub struct LockManager {
    held: Option<HeldLock>,
}

impl LockManager {
    pub fn new() -> Self {
        Self { held: None }
    }

    /// Lock `path`, creating the lock file with mode 0664 if absent.
    ///
    /// Waits up to the fixed timeout for a contended lock and fails with
    /// [`AppError::LockTimeout`] on expiry, leaving no lock held. Any lock
    /// still held from a previous acquire is force-released first; that
    /// release failing is a warning, never a failure of the new acquire.
    pub fn acquire(&mut self, path: &Path) -> AppResult<()> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .mode(0o664)
            .open(path)
            .map_err(|e| {
                tracing::error!(path = %path.display(), error = %e, "failed to create lock file");
                AppError::io(path, e)
            })?;

        // Force any stale lock to become unlocked
        if let Some(stale) = self.held.take() {
            tracing::warn!(path = %stale.path.display(), "forcing stale unlock");
            if let Err(err) = stale.file.unlock() {
                tracing::warn!(
                    path = %stale.path.display(),
                    error = %err,
                    "failed to force stale unlock"
                );
            }
        }

        let deadline = Instant::now() + Duration::from_secs(LOCK_TIMEOUT_SECS);
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => break,
                Err(err) if is_contended(&err) => {
                    if Instant::now() >= deadline {
                        tracing::error!(path = %path.display(), "lock timeout");
                        return Err(AppError::LockTimeout(path.display().to_string()));
                    }
                    thread::sleep(Duration::from_millis(LOCK_POLL_INTERVAL_MS));
                }
                Err(err) => {
                    tracing::error!(path = %path.display(), error = %err, "lock failed");
                    return Err(AppError::io(path, err));
                }
            }
        }

        tracing::debug!(path = %path.display(), "locked");
        self.held = Some(HeldLock {
            file,
            path: path.to_path_buf(),
        });
        Ok(())
    }

    /// Release the currently held lock, if any.
    ///
    /// The in-memory held state is cleared regardless of whether the OS
    /// unlock succeeds; a failed unlock is logged as a warning. Returns
    /// whether a lock had in fact been held.
    pub fn release(&mut self) -> bool {
        match self.held.take() {
            Some(held) => {
                if let Err(err) = held.file.unlock() {
                    tracing::warn!(
                        path = %held.path.display(),
                        error = %err,
                        "failed to unlock"
                    );
                }
                tracing::debug!(path = %held.path.display(), "unlocked");
                true
            }
            None => {
                tracing::warn!("release with no lock held");
                false
            }
        }
    }

    /// Path of the currently held lock, if any
    pub fn held_path(&self) -> Option<&Path> {
        self.held.as_ref().map(|h| h.path.as_path())
    }
}

impl Default for LockManager {
    fn default() -> Self {
        Self::new()
    }
}

fn is_contended(err: &std::io::Error) -> bool {
    err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_creates_lock_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.lock");

        let mut lock = LockManager::new();
        lock.acquire(&path).unwrap();
        assert!(path.is_file());
        assert_eq!(lock.held_path(), Some(path.as_path()));
        assert!(lock.release());
    }

    #[test]
    fn test_release_without_hold_returns_false() {
        let mut lock = LockManager::new();
        assert!(!lock.release());
    }

    #[test]
    fn test_second_acquire_steals_first_lock() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.lock");
        let second = dir.path().join("second.lock");

        let mut lock = LockManager::new();
        lock.acquire(&first).unwrap();
        // No intervening release: the first lock must be force-released
        lock.acquire(&second).unwrap();
        assert_eq!(lock.held_path(), Some(second.as_path()));

        // The first file is free again: an independent manager can take it
        // immediately, which would time out had the steal not released it.
        let mut other = LockManager::new();
        other.acquire(&first).unwrap();
        assert!(other.release());
        assert!(lock.release());
    }

    #[test]
    fn test_reacquire_same_path_after_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.lock");

        let mut lock = LockManager::new();
        lock.acquire(&path).unwrap();
        assert!(lock.release());
        lock.acquire(&path).unwrap();
        assert!(lock.release());
        assert!(!lock.release());
    }

    #[test]
    fn test_acquire_fails_on_unwritable_parent() {
        let mut lock = LockManager::new();
        let err = lock
            .acquire(Path::new("/nonexistent-root/never/here.lock"))
            .unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
        assert!(lock.held_path().is_none());
    }

    #[test]
    fn test_independent_managers_do_not_share_state() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.lock");
        let b = dir.path().join("b.lock");

        let mut one = LockManager::new();
        let mut two = LockManager::new();
        one.acquire(&a).unwrap();
        two.acquire(&b).unwrap();
        assert_eq!(one.held_path(), Some(a.as_path()));
        assert_eq!(two.held_path(), Some(b.as_path()));
        assert!(one.release());
        assert!(two.release());
    }
}
