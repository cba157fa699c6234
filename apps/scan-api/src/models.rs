//! Request/response models for the scan API

use chrono::{DateTime, Utc};
use shared_types::ScanResponse;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ScanRequest {
    #[serde(default)]
    pub filename: Option<String>,
    pub data_base64: String,
}

/// Scan report plus the time it was produced.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScanResult {
    #[serde(flatten)]
    pub report: ScanResponse,
    pub analyzed_at: DateTime<Utc>,
}
