//! Submission service

use std::fs;

use crate::{
    constants::MAX_TARBALL_LEN,
    error::{AppError, AppResult},
    models::SlotRecord,
    store::SubmitStore,
    utils::validation,
};

/// Submission service for business logic
pub struct SubmissionService;

impl SubmissionService {
    /// Validate an upload and store it into the user's slot.
    ///
    /// The filename must match the submit file contract for this user and
    /// slot, and the tarball must fit the size limit. The bytes are saved
    /// into the slot directory first; the slot record is then rewritten
    /// under the slot lock.
    pub fn accept_upload(
        store: &SubmitStore,
        username: &str,
        slot_num: u32,
        filename: &str,
        data: &[u8],
    ) -> AppResult<SlotRecord> {
        validation::validate_upload_filename(username, slot_num, filename)?;

        if data.is_empty() {
            return Err(AppError::Validation("uploaded file is empty".to_string()));
        }
        if data.len() as u64 > MAX_TARBALL_LEN {
            return Err(AppError::Validation(format!(
                "uploaded file is {} bytes, the limit is {MAX_TARBALL_LEN}",
                data.len()
            )));
        }

        // make sure the slot directory exists before saving the file into it
        store.initialize_tree(username)?;

        let upload_path = store.slot_dir(username, slot_num)?.join(filename);
        fs::write(&upload_path, data).map_err(|e| AppError::io(&upload_path, e))?;

        store.update_slot(username, slot_num, &upload_path)?;
        store.slot(username, slot_num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::UPLOADED_SLOT_STATUS;
    use crate::store::test_support::{add_account, scratch_store};
    use crate::utils::crypto;

    #[test]
    fn test_accept_upload_happy_path() {
        let (_dir, store) = scratch_store();
        add_account(&store, "alice", false);

        let record = SubmissionService::accept_upload(
            &store,
            "alice",
            3,
            "submit.alice-3.1700000000.txz",
            b"tarball bytes",
        )
        .unwrap();

        assert_eq!(record.status, UPLOADED_SLOT_STATUS);
        assert_eq!(record.length, Some(13));
        assert_eq!(
            record.sha256.as_deref(),
            Some(crypto::sha256_bytes(b"tarball bytes").as_str())
        );

        let saved = store
            .slot_dir("alice", 3)
            .unwrap()
            .join("submit.alice-3.1700000000.txz");
        assert!(saved.is_file());
    }

    #[test]
    fn test_accept_upload_rejects_bad_filename() {
        let (_dir, store) = scratch_store();
        add_account(&store, "alice", false);

        let err = SubmissionService::accept_upload(
            &store,
            "alice",
            3,
            "evil.tar.gz",
            b"tarball bytes",
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_accept_upload_rejects_empty_and_oversize() {
        let (_dir, store) = scratch_store();
        add_account(&store, "alice", false);

        assert!(matches!(
            SubmissionService::accept_upload(
                &store,
                "alice",
                0,
                "submit.alice-0.1700000000.txz",
                b""
            ),
            Err(AppError::Validation(_))
        ));

        let oversize = vec![0u8; (MAX_TARBALL_LEN + 1) as usize];
        assert!(matches!(
            SubmissionService::accept_upload(
                &store,
                "alice",
                0,
                "submit.alice-0.1700000000.txz",
                &oversize
            ),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_accept_upload_requires_known_user() {
        let (_dir, store) = scratch_store();

        assert!(
            SubmissionService::accept_upload(
                &store,
                "ghost",
                0,
                "submit.ghost-0.1700000000.txz",
                b"data"
            )
            .is_err()
        );
    }
}
