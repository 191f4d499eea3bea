//! Slot response DTOs

use serde::Serialize;

use crate::models::SlotRecord;

/// One slot's metadata as presented to the client
#[derive(Debug, Serialize)]
pub struct SlotResponse {
    pub slot: u32,
    pub filename: Option<String>,
    pub length: Option<u64>,
    pub date: Option<String>,
    pub sha256: Option<String>,
    pub status: String,
}

impl From<SlotRecord> for SlotResponse {
    fn from(record: SlotRecord) -> Self {
        Self {
            slot: record.slot,
            filename: record.filename,
            length: record.length,
            date: record.date,
            sha256: record.sha256,
            status: record.status,
        }
    }
}

/// All of a user's slots
#[derive(Debug, Serialize)]
pub struct SlotListResponse {
    pub slots: Vec<SlotResponse>,
}

/// Successful upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    /// When the contest closes, in the store's timestamp format
    pub close_date: String,
    pub slot: SlotResponse,
}
