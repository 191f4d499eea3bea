//! Cryptographic utilities

use std::fs::File;
use std::io;
use std::path::Path;

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::error::{AppError, AppResult};

/// Generate a cryptographically secure random token
pub fn generate_secure_token(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Compute the SHA-256 digest of a file's contents as lowercase hex
pub fn sha256_file(path: &Path) -> AppResult<String> {
    let mut file = File::open(path).map_err(|e| AppError::io(path, e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| AppError::io(path, e))?;
    Ok(hex::encode(hasher.finalize()))
}

/// Compute the SHA-256 digest of a byte slice as lowercase hex
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

// Punctuation used between password words; backtick, double-quote and
// backslash are left out to keep generated passwords shell- and JSON-friendly.
const PASSWORD_PUNCT: &[u8] = b"!#$%&'()*+,-./:;<=>?@[]^_{|}~";

/// Generate a random initial password.
///
/// Prefers two words from the word list joined by random punctuation and a
/// random `NNN.NNN` suffix; falls back to a random token when the word list
/// cannot be read.
pub fn generate_password(words_file: &Path) -> String {
    let mut rng = rand::rng();

    let words: Vec<String> = match std::fs::read_to_string(words_file) {
        Ok(contents) => contents
            .lines()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect(),
        Err(err) => {
            tracing::warn!(
                path = %words_file.display(),
                error = %err,
                "word list unavailable, generating a random token password"
            );
            Vec::new()
        }
    };

    if words.is_empty() {
        return format!(
            "{}++{}.{}",
            generate_secure_token(20),
            rng.random_range(0..1000),
            rng.random_range(0..1000)
        );
    }

    let word1 = &words[rng.random_range(0..words.len())];
    let word2 = &words[rng.random_range(0..words.len())];
    let punct1 = PASSWORD_PUNCT[rng.random_range(0..PASSWORD_PUNCT.len())] as char;
    let punct2 = PASSWORD_PUNCT[rng.random_range(0..PASSWORD_PUNCT.len())] as char;

    format!(
        "{word1}{punct1}{word2}{punct2}{}.{}",
        rng.random_range(0..1000),
        rng.random_range(0..1000)
    )
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_generate_secure_token() {
        let token1 = generate_secure_token(32);
        let token2 = generate_secure_token(32);

        assert_eq!(token1.len(), 32);
        assert_eq!(token2.len(), 32);
        assert_ne!(token1, token2);
    }

    #[test]
    fn test_sha256_bytes_known_vector() {
        assert_eq!(
            sha256_bytes(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_sha256_file_matches_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        let mut f = File::create(&path).unwrap();
        f.write_all(b"hello").unwrap();
        drop(f);

        assert_eq!(sha256_file(&path).unwrap(), sha256_bytes(b"hello"));
    }

    #[test]
    fn test_sha256_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(sha256_file(&dir.path().join("absent")).is_err());
    }

    #[test]
    fn test_generate_password_from_words() {
        let dir = tempfile::tempdir().unwrap();
        let words = dir.path().join("pw.words");
        std::fs::write(&words, "correct\nhorse\nbattery\nstaple\n").unwrap();

        let password = generate_password(&words);
        assert!(password.len() >= 15, "password too short: {password}");
    }

    #[test]
    fn test_generate_password_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let password = generate_password(&dir.path().join("absent.words"));
        assert!(password.len() >= 20);
    }
}
