//! HTTP handlers for the scan API

use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use std::sync::Arc;

use extract_core::ExtractError;
use shared_types::ScanResponse;

use crate::error::ApiError;
use crate::models::{ScanRequest, ScanResult};
use crate::state::AppState;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Scan an uploaded document for hidden text and prompt-injection risk
pub async fn scan_document(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScanRequest>,
) -> Result<Json<ScanResult>, ApiError> {
    let bytes = BASE64
        .decode(&req.data_base64)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid document base64: {}", e)))?;

    if extract_core::detect_format(&bytes).is_none() {
        let name = req.filename.as_deref().unwrap_or("upload");
        return Err(ApiError::Extraction(ExtractError::UnsupportedFormat(
            name.to_string(),
        )));
    }

    let extraction = extract_core::extract_from_bytes(&bytes)?;
    let analysis = state.engine.analyze(&extraction.spans, &extraction.pages);
    let report = ScanResponse::from_assessment(&analysis.assessment);

    tracing::info!(
        filename = req.filename.as_deref().unwrap_or("upload"),
        risk_level = ?report.risk_level,
        hidden_spans = report.hidden_spans,
        "scanned document"
    );

    Ok(Json(ScanResult {
        report,
        analyzed_at: Utc::now(),
    }))
}
