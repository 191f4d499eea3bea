//! Slot directory tree manager
//!
//! Derives and creates the on-disk layout for a user's fixed set of upload
//! slots, lazily initializes each slot's JSON record, and carries the two
//! mutating slot operations: accepting an upload and rewriting a slot's
//! status string. Each slot's directory holds its `slot.json`, its `lock`
//! file and the currently stored upload side by side.

use std::fs::{self, DirBuilder};
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};

use super::{LockManager, SubmitStore, json_doc};
use crate::{
    constants::{MAX_SUBMIT_SLOT, SLOT_COUNT, SLOT_JSON_FILENAME, SLOT_LOCK_FILENAME,
        UPLOADED_SLOT_STATUS},
    error::{AppError, AppResult},
    models::SlotRecord,
    utils::{crypto, time, validation},
};

/// Create a tree directory with group-writable permissions, parents included
fn create_tree_dir(path: &Path) -> AppResult<()> {
    DirBuilder::new()
        .recursive(true)
        .mode(0o2770)
        .create(path)
        .map_err(|err| {
            tracing::error!(path = %path.display(), error = %err, "failed to create directory");
            AppError::io(path, err)
        })
}

impl SubmitStore {
    /// Path of a user's directory. Pure: validates the username and derives
    /// the path without touching the filesystem.
    pub fn user_dir(&self, username: &str) -> AppResult<PathBuf> {
        validation::validate_username(username)?;
        Ok(self.paths.users_dir.join(username))
    }

    /// Path of one slot directory under a user's directory
    pub fn slot_dir(&self, username: &str, slot_num: u32) -> AppResult<PathBuf> {
        validation::validate_slot_num(slot_num)?;
        Ok(self.user_dir(username)?.join(slot_num.to_string()))
    }

    /// Path of the JSON record for one slot
    pub fn slot_json_file(&self, username: &str, slot_num: u32) -> AppResult<PathBuf> {
        Ok(self.slot_dir(username, slot_num)?.join(SLOT_JSON_FILENAME))
    }

    /// Path of the lock file for one slot
    fn slot_lock_file(&self, username: &str, slot_num: u32) -> AppResult<PathBuf> {
        Ok(self.slot_dir(username, slot_num)?.join(SLOT_LOCK_FILENAME))
    }

    /// Lock one slot for a known user, creating the user and slot
    /// directories (and the lock file itself) as a side effect.
    fn lock_slot_with(
        &self,
        lock: &mut LockManager,
        username: &str,
        slot_num: u32,
    ) -> AppResult<()> {
        self.lookup_with(lock, username)?;
        create_tree_dir(&self.user_dir(username)?)?;
        create_tree_dir(&self.slot_dir(username, slot_num)?)?;
        lock.acquire(&self.slot_lock_file(username, slot_num)?)
    }

    /// Read one slot record, seeding the empty-slot template when the file
    /// does not exist yet. Caller must hold the slot lock. Schema-tag
    /// mismatch on a stored record is a hard failure, never repaired.
    fn read_or_seed_slot(&self, username: &str, slot_num: u32) -> AppResult<SlotRecord> {
        let path = self.slot_json_file(username, slot_num)?;
        match json_doc::read_document::<SlotRecord>(&path) {
            Ok(record) => {
                record.validate()?;
                Ok(record)
            }
            Err(AppError::NotFound(_)) => {
                tracing::debug!(
                    username = %username,
                    slot = slot_num,
                    "forming new slot record"
                );
                let record = SlotRecord::empty(slot_num);
                json_doc::write_document(&path, &record)?;
                Ok(record)
            }
            Err(err) => Err(err),
        }
    }

    /// Initialize the directory tree for a user and return all slot records.
    ///
    /// Idempotent and safe to call on every request: creates whatever part
    /// of the tree is missing, leaves existing slot records untouched. The
    /// username must belong to a known, login-allowed account. Any failure
    /// aborts the whole call; no partial slot array is returned.
    pub fn initialize_tree(&self, username: &str) -> AppResult<Vec<SlotRecord>> {
        let mut lock = self.lock_manager();
        self.initialize_tree_with(&mut lock, username)
    }

    pub(crate) fn initialize_tree_with(
        &self,
        lock: &mut LockManager,
        username: &str,
    ) -> AppResult<Vec<SlotRecord>> {
        let account = self.lookup_with(lock, username)?;
        if !account.login_allowed() {
            return Err(AppError::Forbidden(format!(
                "login not allowed for username: <<{username}>>"
            )));
        }

        let user_dir = self.user_dir(username)?;
        if !user_dir.is_dir() {
            tracing::info!(username = %username, "initializing user directory tree");
        }
        create_tree_dir(&user_dir)?;

        let mut slots = Vec::with_capacity(SLOT_COUNT);
        for slot_num in 0..=MAX_SUBMIT_SLOT {
            create_tree_dir(&self.slot_dir(username, slot_num)?)?;

            lock.acquire(&self.slot_lock_file(username, slot_num)?)?;
            let record = self.read_or_seed_slot(username, slot_num);
            lock.release();
            slots.push(record?);
        }

        tracing::debug!(username = %username, "directory tree ready");
        Ok(slots)
    }

    /// Read the record for one slot under its lock
    pub fn slot(&self, username: &str, slot_num: u32) -> AppResult<SlotRecord> {
        let mut lock = self.lock_manager();
        self.lock_slot_with(&mut lock, username, slot_num)?;
        let result = self
            .slot_json_file(username, slot_num)
            .and_then(|path| json_doc::read_document::<SlotRecord>(&path))
            .and_then(|record| {
                record.validate()?;
                Ok(record)
            });
        lock.release();
        result
    }

    /// Read every slot record for a user, initializing the tree if needed
    pub fn all_slots(&self, username: &str) -> AppResult<Vec<SlotRecord>> {
        self.initialize_tree(username)
    }

    /// Accept an uploaded file into a slot.
    ///
    /// The file at `upload_path` (already saved into the slot directory by
    /// the caller) is hashed before any lock is taken; the slot lock is then
    /// held across re-read, supersession cleanup and the metadata rewrite,
    /// and released on every exit path.
    pub fn update_slot(&self, username: &str, slot_num: u32, upload_path: &Path) -> AppResult<()> {
        let mut lock = self.lock_manager();
        self.initialize_tree_with(&mut lock, username)?;

        let Some(basename) = upload_path.file_name().and_then(|n| n.to_str()) else {
            return Err(AppError::InvalidArgument(format!(
                "upload path has no usable file name: {}",
                upload_path.display()
            )));
        };
        let sha256 = crypto::sha256_file(upload_path)?;
        let length = fs::metadata(upload_path)
            .map_err(|e| AppError::io(upload_path, e))?
            .len();

        self.lock_slot_with(&mut lock, username, slot_num)?;
        let result = self.record_upload(username, slot_num, basename, length, &sha256);
        lock.release();

        if result.is_ok() {
            tracing::info!(username = %username, slot = slot_num, filename = %basename,
                "updated slot");
        }
        result
    }

    /// Rewrite a slot record for a freshly accepted upload.
    /// Caller must hold the slot lock.
    fn record_upload(
        &self,
        username: &str,
        slot_num: u32,
        basename: &str,
        length: u64,
        sha256: &str,
    ) -> AppResult<()> {
        let json_path = self.slot_json_file(username, slot_num)?;
        let mut record: SlotRecord = json_doc::read_document(&json_path)?;
        record.validate()?;

        // A previously stored file with a different name is superseded:
        // remove it, best-effort. The metadata update proceeds even if the
        // removal fails.
        if let Some(old_name) = record.filename.as_deref() {
            if old_name != basename {
                let old_file = self.slot_dir(username, slot_num)?.join(old_name);
                if old_file.is_file() {
                    match fs::remove_file(&old_file) {
                        Ok(()) => {
                            tracing::debug!(
                                username = %username,
                                slot = slot_num,
                                old = %old_name,
                                "removed superseded upload"
                            );
                        }
                        Err(err) => {
                            tracing::warn!(
                                username = %username,
                                slot = slot_num,
                                old = %old_name,
                                error = %err,
                                "failed to remove superseded upload"
                            );
                        }
                    }
                }
            }
        }

        record.filename = Some(basename.to_string());
        record.length = Some(length);
        record.date = Some(time::slot_timestamp(time::now_utc()));
        record.sha256 = Some(sha256.to_string());
        record.status = UPLOADED_SLOT_STATUS.to_string();

        json_doc::write_document(&json_path, &record)
    }

    /// Rewrite only the status string of a slot record
    pub fn update_slot_status(&self, username: &str, slot_num: u32, status: &str) -> AppResult<()> {
        let mut lock = self.lock_manager();
        self.lock_slot_with(&mut lock, username, slot_num)?;

        let result = self
            .slot_json_file(username, slot_num)
            .and_then(|path| {
                let mut record: SlotRecord = json_doc::read_document(&path)?;
                record.validate()?;
                record.status = status.to_string();
                json_doc::write_document(&path, &record)
            });
        lock.release();

        if result.is_ok() {
            tracing::info!(username = %username, slot = slot_num, "updated slot status");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{add_account, scratch_store};
    use super::*;
    use crate::constants::{EMPTY_SLOT_STATUS, NO_COMMENT_VALUE, SLOT_VERSION_VALUE};

    /// Save an upload into the slot directory the way the web layer does,
    /// creating the tree first so the directory exists.
    fn save_upload(store: &SubmitStore, username: &str, slot_num: u32, name: &str, data: &[u8])
    -> PathBuf {
        store.initialize_tree(username).unwrap();
        let path = store.slot_dir(username, slot_num).unwrap().join(name);
        fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_path_derivation() {
        let (_dir, store) = scratch_store();
        let user_dir = store.user_dir("alice").unwrap();
        assert!(user_dir.ends_with("users/alice"));
        assert!(store.slot_dir("alice", 3).unwrap().ends_with("users/alice/3"));
        assert!(
            store
                .slot_json_file("alice", 3)
                .unwrap()
                .ends_with("users/alice/3/slot.json")
        );

        assert!(matches!(
            store.user_dir("no/slash"),
            Err(AppError::InvalidUsername(_))
        ));
        assert!(matches!(
            store.slot_dir("alice", 10),
            Err(AppError::InvalidSlot(10))
        ));
    }

    #[test]
    fn test_initialize_tree_creates_all_slots() {
        let (_dir, store) = scratch_store();
        add_account(&store, "alice", false);

        let slots = store.initialize_tree("alice").unwrap();
        assert_eq!(slots.len(), SLOT_COUNT);
        for (n, record) in slots.iter().enumerate() {
            assert_eq!(record.slot, n as u32);
            assert_eq!(record.status, EMPTY_SLOT_STATUS);
            assert_eq!(record.no_comment, NO_COMMENT_VALUE);
            assert_eq!(record.format_version, SLOT_VERSION_VALUE);
            assert!(store.slot_json_file("alice", n as u32).unwrap().is_file());
        }
    }

    #[test]
    fn test_initialize_tree_requires_known_account() {
        let (_dir, store) = scratch_store();
        assert!(matches!(
            store.initialize_tree("ghost"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_initialize_tree_requires_login_allowed() {
        let (_dir, store) = scratch_store();
        store
            .upsert_account("alice", "hash", false, false, None, true)
            .unwrap();
        assert!(matches!(
            store.initialize_tree("alice"),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_initialize_tree_is_idempotent() {
        let (_dir, store) = scratch_store();
        add_account(&store, "alice", false);

        let upload = save_upload(&store, "alice", 2, "submit.alice-2.1700000000.txz", b"data");
        store.update_slot("alice", 2, &upload).unwrap();

        // a second initialization must not reset the occupied slot
        let slots = store.initialize_tree("alice").unwrap();
        assert_eq!(
            slots[2].filename.as_deref(),
            Some("submit.alice-2.1700000000.txz")
        );
        assert_eq!(slots[0].status, EMPTY_SLOT_STATUS);
    }

    #[test]
    fn test_initialize_tree_rejects_schema_drift() {
        let (_dir, store) = scratch_store();
        add_account(&store, "alice", false);
        store.initialize_tree("alice").unwrap();

        let path = store.slot_json_file("alice", 5).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::write(&path, text.replace(SLOT_VERSION_VALUE, "0.0 1999-01-01")).unwrap();

        assert!(matches!(
            store.initialize_tree("alice"),
            Err(AppError::SchemaInvalid(_))
        ));
    }

    #[test]
    fn test_update_slot_records_hash_length_and_name() {
        let (_dir, store) = scratch_store();
        add_account(&store, "alice", false);

        let upload = save_upload(&store, "alice", 3, "submit.alice-3.1700000000.txz", b"hello");
        store.update_slot("alice", 3, &upload).unwrap();

        let record = store.slot("alice", 3).unwrap();
        assert_eq!(record.sha256.as_deref(), Some(crypto::sha256_bytes(b"hello").as_str()));
        assert_eq!(record.length, Some(5));
        assert_eq!(
            record.filename.as_deref(),
            Some("submit.alice-3.1700000000.txz")
        );
        assert_eq!(record.status, UPLOADED_SLOT_STATUS);
        assert!(record.date.as_deref().unwrap().ends_with(" UTC"));
        assert!(record.is_occupied());
    }

    #[test]
    fn test_update_slot_supersedes_old_file() {
        let (_dir, store) = scratch_store();
        add_account(&store, "alice", false);

        let first = save_upload(&store, "alice", 1, "submit.alice-1.1700000000.txz", b"one");
        store.update_slot("alice", 1, &first).unwrap();

        let second = save_upload(&store, "alice", 1, "submit.alice-1.1800000000.txz", b"two");
        store.update_slot("alice", 1, &second).unwrap();

        assert!(!first.exists(), "superseded upload must be removed");
        assert!(second.exists());
        let record = store.slot("alice", 1).unwrap();
        assert_eq!(
            record.filename.as_deref(),
            Some("submit.alice-1.1800000000.txz")
        );
    }

    #[test]
    fn test_update_slot_same_filename_keeps_file() {
        let (_dir, store) = scratch_store();
        add_account(&store, "alice", false);

        let upload = save_upload(&store, "alice", 1, "submit.alice-1.1700000000.txz", b"one");
        store.update_slot("alice", 1, &upload).unwrap();
        fs::write(&upload, b"one-revised").unwrap();
        store.update_slot("alice", 1, &upload).unwrap();

        assert!(upload.exists());
        let record = store.slot("alice", 1).unwrap();
        assert_eq!(record.length, Some(11));
        assert_eq!(
            record.sha256.as_deref(),
            Some(crypto::sha256_bytes(b"one-revised").as_str())
        );
    }

    #[test]
    fn test_update_slot_missing_upload_fails_cleanly() {
        let (_dir, store) = scratch_store();
        add_account(&store, "alice", false);
        store.initialize_tree("alice").unwrap();

        let bogus = store.slot_dir("alice", 0).unwrap().join("never-saved.txz");
        assert!(store.update_slot("alice", 0, &bogus).is_err());

        // no lock leaked: the next operation proceeds normally
        let record = store.slot("alice", 0).unwrap();
        assert_eq!(record.status, EMPTY_SLOT_STATUS);
    }

    #[test]
    fn test_update_slot_status() {
        let (_dir, store) = scratch_store();
        add_account(&store, "alice", false);
        store.initialize_tree("alice").unwrap();

        store
            .update_slot_status("alice", 4, "withdrawn by request")
            .unwrap();

        let record = store.slot("alice", 4).unwrap();
        assert_eq!(record.status, "withdrawn by request");
        assert!(!record.is_occupied());
    }

    #[test]
    fn test_end_to_end_submission_scenario() {
        let (_dir, store) = scratch_store();
        add_account(&store, "alice", false);

        let slots = store.initialize_tree("alice").unwrap();
        assert_eq!(slots.len(), 10);
        assert!(slots.iter().all(|s| s.status == EMPTY_SLOT_STATUS));

        let upload = save_upload(&store, "alice", 3, "submit.alice-3.1700000000.txz", b"hello");
        store.update_slot("alice", 3, &upload).unwrap();

        let record: SlotRecord =
            json_doc::read_document(&store.slot_json_file("alice", 3).unwrap()).unwrap();
        assert_eq!(record.sha256.as_deref(), Some(crypto::sha256_bytes(b"hello").as_str()));
        assert_eq!(
            record.filename.as_deref(),
            Some("submit.alice-3.1700000000.txz")
        );
        assert_eq!(record.status, UPLOADED_SLOT_STATUS);
    }
}
