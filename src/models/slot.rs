//! Slot record model

use serde::{Deserialize, Serialize};

use crate::{
    constants::{EMPTY_SLOT_STATUS, NO_COMMENT_VALUE, SLOT_VERSION_VALUE},
    error::{AppError, AppResult},
};

/// Per-slot metadata stored as `slot.json` inside the slot directory.
///
/// `filename`, `length`, `date` and `sha256` are all null for an empty slot
/// and all populated once an upload has been accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotRecord {
    pub no_comment: String,
    #[serde(rename = "slot_JSON_format_version")]
    pub format_version: String,
    pub slot: u32,
    pub filename: Option<String>,
    pub length: Option<u64>,
    pub date: Option<String>,
    pub sha256: Option<String>,
    pub status: String,
}

impl SlotRecord {
    /// The empty-slot template, typed with the given slot number
    pub fn empty(slot_num: u32) -> Self {
        Self {
            no_comment: NO_COMMENT_VALUE.to_string(),
            format_version: SLOT_VERSION_VALUE.to_string(),
            slot: slot_num,
            filename: None,
            length: None,
            date: None,
            sha256: None,
            status: EMPTY_SLOT_STATUS.to_string(),
        }
    }

    /// Sanity check a record read back from a slot file
    pub fn validate(&self) -> AppResult<()> {
        if self.no_comment != NO_COMMENT_VALUE || self.format_version != SLOT_VERSION_VALUE {
            return Err(AppError::SchemaInvalid(format!("slot {}", self.slot)));
        }
        Ok(())
    }

    /// A slot is occupied once an upload has been recorded in it
    pub fn is_occupied(&self) -> bool {
        self.filename.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_template() {
        let rec = SlotRecord::empty(4);
        assert_eq!(rec.slot, 4);
        assert_eq!(rec.status, EMPTY_SLOT_STATUS);
        assert!(rec.filename.is_none());
        assert!(rec.length.is_none());
        assert!(rec.date.is_none());
        assert!(rec.sha256.is_none());
        assert!(!rec.is_occupied());
        assert!(rec.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_tags() {
        let mut rec = SlotRecord::empty(0);
        rec.no_comment.push('!');
        assert!(matches!(rec.validate(), Err(AppError::SchemaInvalid(_))));

        let mut rec = SlotRecord::empty(0);
        rec.format_version = "9.9 2099-01-01".to_string();
        assert!(rec.validate().is_err());
    }

    #[test]
    fn test_serde_field_names() {
        let rec = SlotRecord::empty(7);
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["slot"], 7);
        assert!(value.get("slot_JSON_format_version").is_some());
        assert!(value.get("no_comment").is_some());
        assert!(value["filename"].is_null());
    }
}
