//! Document loading and format detection.
//!
//! Validates the input path and sniffs the format from magic bytes before
//! anything touches a parser. Extension checks alone are not trusted.

use std::fs;
use std::path::Path;

use crate::error::ExtractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
}

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Sniff the document format from its leading bytes.
pub fn detect_format(bytes: &[u8]) -> Option<DocumentFormat> {
    if bytes.starts_with(PDF_MAGIC) {
        Some(DocumentFormat::Pdf)
    } else {
        None
    }
}

/// Validate the path and read the document, returning its bytes and format.
pub fn load(path: &Path) -> Result<(Vec<u8>, DocumentFormat), ExtractError> {
    if !path.exists() {
        return Err(ExtractError::NotFound(path.display().to_string()));
    }
    if !path.is_file() {
        return Err(ExtractError::NotAFile(path.display().to_string()));
    }

    let bytes = fs::read(path)?;
    let format = detect_format(&bytes)
        .ok_or_else(|| ExtractError::UnsupportedFormat(path.display().to_string()))?;

    tracing::debug!(path = %path.display(), size = bytes.len(), "loaded document");
    Ok((bytes, format))
}
