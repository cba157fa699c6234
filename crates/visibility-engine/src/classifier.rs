//! Multi-criterion visibility classification.
//!
//! Each span is checked against four independent criteria (position,
//! contrast, font size, metadata presence). Every criterion that triggers
//! contributes a reason; the verdict's primary category is the most severe
//! one present. Spans with unusable metadata are never dropped and never
//! downgraded to hidden.

use shared_types::{BoundingBox, PageGeometry, TextSpan, VisibilityCategory, VisibilityVerdict};

use crate::color::contrast_ratio;
use crate::config::EngineConfig;

pub const INSUFFICIENT_METADATA_REASON: &str = "insufficient metadata to assess";
pub const MALFORMED_BBOX_REASON: &str = "bounding box contains non-finite coordinates";
pub const OFFSCREEN_REASON: &str = "rendered outside the visible page area";

/// Classify one span against the page it appears on.
pub fn classify(
    span_index: usize,
    span: &TextSpan,
    geometry: PageGeometry,
    config: &EngineConfig,
) -> VisibilityVerdict {
    let mut triggered: Vec<VisibilityCategory> = Vec::new();
    let mut reasons: Vec<String> = Vec::new();

    // Position: a malformed box skips the check but records the anomaly.
    if !span.bbox.is_finite() {
        reasons.push(MALFORMED_BBOX_REASON.to_string());
    } else if is_offscreen(&span.bbox, geometry) {
        triggered.push(VisibilityCategory::Offscreen);
        reasons.push(OFFSCREEN_REASON.to_string());
    }

    // Contrast: only assessable when both colors are known.
    let ratio = match (span.font_color, span.background_color) {
        (Some(fg), Some(bg)) => Some(contrast_ratio(fg, bg)),
        _ => None,
    };
    if let Some(ratio) = ratio {
        if ratio < config.invisible_contrast {
            triggered.push(VisibilityCategory::Invisible);
            reasons.push(format!("nearly invisible (contrast: {:.2}:1)", ratio));
        } else if ratio < config.contrast_threshold {
            triggered.push(VisibilityCategory::LowContrast);
            reasons.push(format!("low contrast ({:.2}:1)", ratio));
        }
    }

    // Font size.
    if let Some(size) = span.font_size {
        if size < config.microscopic_font_size {
            triggered.push(VisibilityCategory::Microscopic);
            reasons.push(format!("impossible to read, {}pt", size));
        } else if size < config.small_font_size {
            triggered.push(VisibilityCategory::Small);
            reasons.push(format!("very difficult to read, {}pt", size));
        }
    }

    let category = triggered
        .into_iter()
        .max()
        .unwrap_or(VisibilityCategory::Visible);

    // A span nothing could be said about stays visible, with the gap on
    // record rather than silently passing.
    if category == VisibilityCategory::Visible && ratio.is_none() && span.font_size.is_none() {
        reasons.push(INSUFFICIENT_METADATA_REASON.to_string());
    }

    VisibilityVerdict::new(span_index, span.page_number, category, reasons, ratio)
}

/// The box lies entirely outside the visible page area.
fn is_offscreen(bbox: &BoundingBox, geometry: PageGeometry) -> bool {
    bbox.x1 < 0.0 || bbox.y1 < 0.0 || bbox.x0 > geometry.width || bbox.y0 > geometry.height
}
