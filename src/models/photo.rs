use chrono::{DateTime, Utc};
use serde::Serialize;

/// Response body for a successful upload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    /// Full storage key of the stored object
    pub filename: String,
    pub public_url: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// One entry in the admin photo listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoEntry {
    pub name: String,
    pub size: u64,
    /// Null when the backend reports no modification time
    pub uploaded_at: Option<DateTime<Utc>>,
    pub public_url: String,
    pub content_type: String,
}

/// Response body for the admin photo listing
#[derive(Debug, Serialize)]
pub struct PhotoListResponse {
    pub success: bool,
    pub count: usize,
    pub photos: Vec<PhotoEntry>,
}

/// Response body for a delete
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// Response body for the liveness probe
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}
