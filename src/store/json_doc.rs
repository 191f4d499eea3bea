//! Durable JSON document helpers
//!
//! Whole-document reads and rewrites for the password file, the contest
//! state file and the per-slot records. Callers hold the appropriate
//! advisory lock around these calls; nothing here locks on its own.
//!
//! Documents are written as pretty-printed, ASCII-escaped JSON with a
//! trailing newline, and the write is flushed and synced before the call
//! returns so a close-time failure surfaces as a write failure. Rewrites are
//! not temp-file-plus-rename atomic; a process killed mid-write can truncate
//! the document (accepted for this single-process, low-write-rate store).

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{AppError, AppResult};

/// Copy the seed template over `path` when `path` is missing or zero-length.
///
/// First-run deployments self-heal through this: the caller never needs a
/// separate provisioning step for the password or state files.
pub fn seed_if_missing(path: &Path, template: &Path) -> AppResult<()> {
    let needs_seed = match fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(err) if err.kind() == ErrorKind::NotFound => true,
        Err(err) => return Err(AppError::io(path, err)),
    };

    if needs_seed {
        fs::copy(template, path).map_err(|err| {
            tracing::error!(
                template = %template.display(),
                target = %path.display(),
                error = %err,
                "failed to seed store file from template"
            );
            AppError::io(template, err)
        })?;
        tracing::info!(
            template = %template.display(),
            target = %path.display(),
            "seeded store file from template"
        );
    }
    Ok(())
}

/// Read and parse a whole JSON document.
///
/// A missing file is reported as [`AppError::NotFound`] so callers can branch
/// on absence explicitly; a present-but-unparseable file is
/// [`AppError::StoreUnreadable`].
pub fn read_document<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(AppError::NotFound(path.display().to_string()));
        }
        Err(err) => return Err(AppError::io(path, err)),
    };
    serde_json::from_str(&contents).map_err(|err| AppError::unreadable(path, err))
}

/// Serialize `value` and rewrite `path` in place.
pub fn write_document<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    let body = to_ascii_pretty(value)?;

    let mut file = File::create(path).map_err(|e| AppError::io(path, e))?;
    file.write_all(body.as_bytes())
        .and_then(|()| file.write_all(b"\n"))
        .and_then(|()| file.flush())
        // sync before close so a buffered write that cannot reach the disk
        // fails here instead of succeeding silently
        .and_then(|()| file.sync_all())
        .map_err(|err| {
            tracing::error!(path = %path.display(), error = %err, "failed to write store file");
            AppError::io(path, err)
        })?;
    Ok(())
}

/// Pretty-print with 4-space indentation and every non-ASCII character
/// escaped as `\uXXXX`.
fn to_ascii_pretty<T: Serialize>(value: &T) -> AppResult<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JSON serialization failed: {e}")))?;
    let text = String::from_utf8(buf)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serializer produced non-UTF-8: {e}")))?;

    // Non-ASCII bytes can only occur inside string literals, so a plain
    // character-level rewrite of the rendered text is safe.
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else {
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{unit:04x}");
            }
        }
    }
    Ok(out)
}
