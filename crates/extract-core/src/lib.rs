//! Document loading and text-span extraction.
//!
//! This crate is the mechanical front half of the pipeline: it turns a PDF
//! into a flat sequence of `TextSpan`s with positional and styling metadata,
//! plus per-page geometry. All judgement about what those spans mean lives
//! in `visibility-engine`.

pub mod error;
pub mod loader;
pub mod pdf;

pub use error::ExtractError;
pub use loader::{detect_format, DocumentFormat};
pub use pdf::{extract_from_bytes, Extraction};

use std::path::Path;

/// Load a document from disk and extract its text spans.
pub fn extract_spans<P: AsRef<Path>>(path: P) -> Result<Extraction, ExtractError> {
    let path = path.as_ref();
    let (bytes, format) = loader::load(path)?;

    match format {
        DocumentFormat::Pdf => pdf::extract_from_bytes(&bytes),
    }
}
