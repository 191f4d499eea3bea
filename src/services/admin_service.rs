//! Admin service

use chrono::Duration;

use crate::{
    constants::DEFAULT_GRACE_PERIOD_SECS,
    error::{AppError, AppResult},
    models::AccountRecord,
    services::AuthService,
    store::SubmitStore,
    utils::{crypto, time, validation},
};

/// Admin service for account and contest-window management
pub struct AdminService;

impl AdminService {
    /// List every account in the password store
    pub fn list_users(store: &SubmitStore) -> AppResult<Vec<AccountRecord>> {
        store.load_accounts()
    }

    /// Create a new account.
    ///
    /// Uses the given password when one is supplied, otherwise generates an
    /// initial one from the word list. Either way the user must change it
    /// within the grace period; the plaintext is returned so the admin can
    /// hand it to the user.
    pub fn add_user(
        store: &SubmitStore,
        username: &str,
        admin: bool,
        password: Option<&str>,
    ) -> AppResult<(AccountRecord, String)> {
        validation::validate_username(username)?;
        if store.lookup(username).is_ok() {
            return Err(AppError::AlreadyExists(format!(
                "username already in the password store: <<{username}>>"
            )));
        }

        let password = match password {
            Some(given) => {
                validation::validate_password(given)?;
                given.to_string()
            }
            None => crypto::generate_password(&store.paths().pw_words),
        };
        let pwhash = AuthService::hash_password(&password)?;
        let deadline = Self::grace_deadline();

        store.upsert_account(username, &pwhash, admin, true, Some(deadline.as_str()), false)?;

        let account = store.lookup(username)?;
        tracing::info!(username = %username, admin = admin, "account created");
        Ok((account, password))
    }

    /// Update the access flags on an existing account, leaving unspecified
    /// fields as they are
    pub fn update_user(
        store: &SubmitStore,
        username: &str,
        admin: Option<bool>,
        disable_login: Option<bool>,
    ) -> AppResult<AccountRecord> {
        let account = store.lookup(username)?;

        store.upsert_account(
            username,
            &account.pwhash,
            admin.unwrap_or(account.admin),
            account.force_pw_change,
            account.pw_change_by.as_deref(),
            disable_login.unwrap_or(account.disable_login),
        )?;
        store.lookup(username)
    }

    /// Replace an account's password with a freshly generated one the user
    /// must change within the grace period; returns the plaintext
    pub fn reset_password(store: &SubmitStore, username: &str) -> AppResult<String> {
        let account = store.lookup(username)?;

        let password = crypto::generate_password(&store.paths().pw_words);
        let pwhash = AuthService::hash_password(&password)?;
        let deadline = Self::grace_deadline();

        store.upsert_account(
            username,
            &pwhash,
            account.admin,
            true,
            Some(deadline.as_str()),
            account.disable_login,
        )?;

        tracing::info!(username = %username, "password reset");
        Ok(password)
    }

    /// Remove an account, returning the removed record
    pub fn delete_user(store: &SubmitStore, username: &str) -> AppResult<AccountRecord> {
        store.delete_account(username)
    }

    /// Whether this account carries admin rights, either via its own flag or
    /// via the read-only allowlist file
    pub fn is_admin(store: &SubmitStore, account: &AccountRecord) -> bool {
        account.admin
            || store
                .admin_allowlist()
                .iter()
                .any(|name| name == &account.username)
    }

    /// Set the contest open/close window
    pub fn set_contest_window(
        store: &SubmitStore,
        open_date: &str,
        close_date: &str,
    ) -> AppResult<()> {
        store.update_state(open_date, close_date)
    }

    fn grace_deadline() -> String {
        time::format_datetime(time::now_utc() + Duration::seconds(DEFAULT_GRACE_PERIOD_SECS))
    }
}
