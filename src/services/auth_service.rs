//! Authentication service

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::AccountRecord,
    store::SubmitStore,
    utils::validation,
};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    pub admin: bool,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Authenticate a login attempt.
    ///
    /// Fails with [`AppError::InvalidCredentials`] for an unknown username or
    /// a wrong password, and with [`AppError::Forbidden`] when the account is
    /// not allowed to log in (disabled, or past its password-change
    /// deadline).
    pub fn login(store: &SubmitStore, username: &str, password: &str) -> AppResult<AccountRecord> {
        let account = match store.lookup(username) {
            Ok(account) => account,
            Err(AppError::NotFound(_)) => return Err(AppError::InvalidCredentials),
            Err(err) => return Err(err),
        };

        if !account.login_allowed() {
            return Err(AppError::Forbidden(format!(
                "login not allowed for username: <<{username}>>"
            )));
        }

        if !Self::verify_password(password, &account.pwhash)? {
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(username = %username, "login successful");
        Ok(account)
    }

    /// Change a user's password.
    ///
    /// The old password must verify and the new one must satisfy the length
    /// rules; a successful change clears any forced-change state.
    pub fn change_password(
        store: &SubmitStore,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        validation::validate_password(new_password)?;

        let account = store.lookup(username)?;
        if !account.login_allowed() {
            return Err(AppError::Forbidden(format!(
                "login not allowed for username: <<{username}>>"
            )));
        }
        if !Self::verify_password(old_password, &account.pwhash)? {
            return Err(AppError::InvalidCredentials);
        }

        let pwhash = Self::hash_password(new_password)?;
        store.upsert_account(
            username,
            &pwhash,
            account.admin,
            false,
            None,
            account.disable_login,
        )?;

        tracing::info!(username = %username, "password updated");
        Ok(())
    }

    /// Verify a bearer token and extract its claims
    pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Generate a session token for an authenticated account
    pub fn generate_token(
        account: &AccountRecord,
        secret: &str,
        expiry_hours: i64,
    ) -> AppResult<(String, i64)> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(expiry_hours);
        let expires_in = expiry_hours * 3600;

        let claims = Claims {
            sub: account.username.clone(),
            admin: account.admin,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))?;

        Ok((token, expires_in))
    }

    /// Hash a password using Argon2
    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(hash)
    }

    /// Verify a password against a stored hash
    pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
