//! Account record manager
//!
//! Read-modify-write of account entries inside the password store. The store
//! is one JSON array of records; it is small enough that a linear scan plus a
//! whole-file rewrite is the right trade, and the whole file is the unit of
//! locking (`etc/iocccpasswd.lock`).

use super::{LockManager, SubmitStore, json_doc};
use crate::{
    error::{AppError, AppResult},
    models::AccountRecord,
    utils::{time, validation},
};

impl SubmitStore {
    /// Seed the password file from its template if needed, then read it.
    /// Caller must hold the password lock.
    fn read_accounts_seeded(&self) -> AppResult<Vec<AccountRecord>> {
        json_doc::seed_if_missing(&self.paths.pw_file, &self.paths.init_pw_file)?;
        json_doc::read_document(&self.paths.pw_file)
    }

    /// Run `f` with the password store lock held
    fn with_pw_lock<T>(
        &self,
        lock: &mut LockManager,
        f: impl FnOnce() -> AppResult<T>,
    ) -> AppResult<T> {
        lock.acquire(&self.paths.pw_lock)?;
        let result = f();
        lock.release();
        result
    }

    /// Load every account record (seeding an absent or empty store first)
    pub fn load_accounts(&self) -> AppResult<Vec<AccountRecord>> {
        let mut lock = self.lock_manager();
        self.load_accounts_with(&mut lock)
    }

    pub(crate) fn load_accounts_with(
        &self,
        lock: &mut LockManager,
    ) -> AppResult<Vec<AccountRecord>> {
        self.with_pw_lock(lock, || self.read_accounts_seeded())
    }

    /// Find the account record for `username`
    pub fn lookup(&self, username: &str) -> AppResult<AccountRecord> {
        let mut lock = self.lock_manager();
        self.lookup_with(&mut lock, username)
    }

    pub(crate) fn lookup_with(
        &self,
        lock: &mut LockManager,
        username: &str,
    ) -> AppResult<AccountRecord> {
        validation::validate_username(username)?;

        let accounts = self.load_accounts_with(lock)?;
        let record = accounts
            .into_iter()
            .find(|r| r.username == username)
            .ok_or_else(|| AppError::NotFound(format!("unknown username: <<{username}>>")))?;
        record.validate()?;
        Ok(record)
    }

    /// Update the entry for `username`, or append a new one.
    ///
    /// The read, the mutation and the rewrite all happen under the password
    /// store lock so concurrent tool invocations cannot lose updates.
    pub fn upsert_account(
        &self,
        username: &str,
        pwhash: &str,
        admin: bool,
        force_pw_change: bool,
        pw_change_by: Option<&str>,
        disable_login: bool,
    ) -> AppResult<()> {
        validation::validate_username(username)?;
        if let Some(deadline) = pw_change_by {
            // reject a deadline the login check could never parse back
            time::parse_datetime(deadline)?;
        }

        let mut lock = self.lock_manager();
        self.with_pw_lock(&mut lock, || {
            let mut accounts = self.read_accounts_seeded()?;
            match accounts.iter_mut().find(|r| r.username == username) {
                Some(record) => {
                    record.pwhash = pwhash.to_string();
                    record.admin = admin;
                    record.force_pw_change = force_pw_change;
                    record.pw_change_by = pw_change_by.map(str::to_string);
                    record.disable_login = disable_login;
                }
                None => {
                    accounts.push(AccountRecord::new(
                        username,
                        pwhash,
                        admin,
                        force_pw_change,
                        pw_change_by.map(str::to_string),
                        disable_login,
                    ));
                }
            }
            json_doc::write_document(&self.paths.pw_file, &accounts)
        })?;

        tracing::info!(username = %username, "password store updated");
        Ok(())
    }

    /// Remove `username` from the password store, returning the removed record
    pub fn delete_account(&self, username: &str) -> AppResult<AccountRecord> {
        validation::validate_username(username)?;

        let mut lock = self.lock_manager();
        let removed = self.with_pw_lock(&mut lock, || {
            let accounts = self.read_accounts_seeded()?;
            let mut removed = None;
            let remaining: Vec<AccountRecord> = accounts
                .into_iter()
                .filter_map(|record| {
                    if record.username == username {
                        removed = Some(record);
                        None
                    } else {
                        Some(record)
                    }
                })
                .collect();
            json_doc::write_document(&self.paths.pw_file, &remaining)?;
            Ok(removed)
        })?;

        match removed {
            Some(record) => {
                tracing::info!(username = %username, "account deleted");
                Ok(record)
            }
            None => Err(AppError::NotFound(format!(
                "unknown username: <<{username}>>"
            ))),
        }
    }

    /// Best-effort read of the admin allowlist (`etc/admins.json`).
    ///
    /// The file is read-only to this server; a missing or unreadable file
    /// simply yields an empty list.
    pub fn admin_allowlist(&self) -> Vec<String> {
        match json_doc::read_document::<Vec<String>>(&self.paths.admins_file) {
            Ok(admins) => admins,
            Err(err) => {
                tracing::debug!(
                    path = %self.paths.admins_file.display(),
                    error = %err,
                    "admin allowlist not available"
                );
                Vec::new()
            }
        }
    }
}
