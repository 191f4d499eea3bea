//! Server secret
//!
//! Best-effort reader for `etc/.secret`, the opaque value the web layer
//! signs its sessions with. When the file is missing or too short a random
//! secret is generated on the fly; that keeps a test instance working but
//! means separate server instances will not share sessions, hence the
//! warning.

use std::fs;

use super::SubmitStore;
use crate::{
    constants::{GENERATED_SECRET_LEN, MIN_SECRET_LEN},
    utils::crypto,
};

impl SubmitStore {
    /// First line of the secret file, or a freshly generated fallback
    pub fn session_secret(&self) -> String {
        match fs::read_to_string(&self.paths.secret_file) {
            Ok(contents) => {
                let secret = contents.lines().next().unwrap_or("").trim_end().to_string();
                if secret.len() >= MIN_SECRET_LEN {
                    secret
                } else {
                    tracing::warn!(
                        path = %self.paths.secret_file.display(),
                        "secret file too short, generating a secret on the fly"
                    );
                    crypto::generate_secure_token(GENERATED_SECRET_LEN)
                }
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.paths.secret_file.display(),
                    error = %err,
                    "secret file unreadable, generating a secret on the fly"
                );
                crypto::generate_secure_token(GENERATED_SECRET_LEN)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::scratch_store;
    use super::*;

    #[test]
    fn test_reads_first_line() {
        let (_dir, store) = scratch_store();
        fs::write(
            &store.paths().secret_file,
            "super-secret-signing-key\nsecond line ignored\n",
        )
        .unwrap();

        assert_eq!(store.session_secret(), "super-secret-signing-key");
    }

    #[test]
    fn test_generates_when_missing() {
        let (_dir, store) = scratch_store();
        let secret = store.session_secret();
        assert_eq!(secret.len(), GENERATED_SECRET_LEN);
    }

    #[test]
    fn test_generates_when_too_short() {
        let (_dir, store) = scratch_store();
        fs::write(&store.paths().secret_file, "tiny\n").unwrap();

        let secret = store.session_secret();
        assert_ne!(secret, "tiny");
        assert!(secret.len() >= MIN_SECRET_LEN);
    }
}
