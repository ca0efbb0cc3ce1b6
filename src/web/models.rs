// API-specific data models for the web server

use crate::models::DerivativeRecord;
use serde::{Deserialize, Serialize};

pub const UPLOAD_SUCCESS_MESSAGE: &str = "Upload processed successfully";

/// Body of a successful `POST /upload`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UploadResponse {
    pub message: String,
    pub record: DerivativeRecord,
}

impl From<DerivativeRecord> for UploadResponse {
    fn from(record: DerivativeRecord) -> Self {
        Self {
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            record,
        }
    }
}

/// Query parameters for `GET /download`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DownloadQuery {
    pub path: Option<String>,
}
