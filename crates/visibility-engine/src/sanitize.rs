//! Text sanitization for safe downstream LLM processing.
//!
//! Once a document has been classified, the sanitizer rebuilds its text with
//! hidden spans removed, flagged, or preserved, and reports what it did.

use std::str::FromStr;

use shared_types::{RiskLevel, TextSpan, VisibilityVerdict};

/// How to handle hidden spans when rebuilding document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SanitizeStrategy {
    /// Remove hidden spans entirely.
    Strip,
    /// Keep hidden spans but mark them.
    Flag,
    /// Keep everything; metadata only.
    Preserve,
}

impl SanitizeStrategy {
    /// Adaptive choice: strip outright for high-risk documents, flag for
    /// medium risk, otherwise use the requested default.
    pub fn for_risk_level(level: RiskLevel, default: SanitizeStrategy) -> Self {
        match level {
            RiskLevel::High | RiskLevel::Critical => SanitizeStrategy::Strip,
            RiskLevel::Medium => SanitizeStrategy::Flag,
            _ => default,
        }
    }
}

impl FromStr for SanitizeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strip" => Ok(SanitizeStrategy::Strip),
            "flag" => Ok(SanitizeStrategy::Flag),
            "preserve" => Ok(SanitizeStrategy::Preserve),
            other => Err(format!(
                "invalid strategy '{other}', expected strip, flag, or preserve"
            )),
        }
    }
}

const FLAG_PREFIX: &str = "[HIDDEN] ";
const REMOVED_SAMPLE_LIMIT: usize = 5;

/// Record of the sanitization actions taken on one document.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SanitizeReport {
    pub original_span_count: usize,
    pub sanitized_span_count: usize,
    pub removed_count: usize,
    pub flagged_count: usize,
    pub strategy_used: SanitizeStrategy,
    /// Up to five removed texts, kept for audit.
    pub removed_text_sample: Vec<String>,
    /// Rebuilt document text, ready for LLM processing.
    pub safe_text: String,
}

/// Rebuild document text according to the strategy. `spans` and `verdicts`
/// must come from the same analysis run (verdicts index into the span slice).
pub fn sanitize(
    spans: &[TextSpan],
    verdicts: &[VisibilityVerdict],
    strategy: SanitizeStrategy,
) -> SanitizeReport {
    let mut kept: Vec<(u32, String)> = Vec::with_capacity(spans.len());
    let mut removed_count = 0;
    let mut flagged_count = 0;
    let mut removed_text_sample = Vec::new();

    for verdict in verdicts {
        let Some(span) = spans.get(verdict.span_index) else {
            continue;
        };

        if verdict.is_hidden {
            match strategy {
                SanitizeStrategy::Strip => {
                    removed_count += 1;
                    if removed_text_sample.len() < REMOVED_SAMPLE_LIMIT {
                        removed_text_sample.push(span.text.clone());
                    }
                    continue;
                }
                SanitizeStrategy::Flag => {
                    flagged_count += 1;
                    kept.push((span.page_number, format!("{FLAG_PREFIX}{}", span.text)));
                    continue;
                }
                SanitizeStrategy::Preserve => {}
            }
        }
        kept.push((span.page_number, span.text.clone()));
    }

    let sanitized_span_count = kept.len();
    let safe_text = reconstruct_text(&kept);

    SanitizeReport {
        original_span_count: spans.len(),
        sanitized_span_count,
        removed_count,
        flagged_count,
        strategy_used: strategy,
        removed_text_sample,
        safe_text,
    }
}

/// Join span texts in order, inserting a separator whenever the page changes.
fn reconstruct_text(parts: &[(u32, String)]) -> String {
    let mut pieces: Vec<String> = Vec::with_capacity(parts.len());
    let mut current_page = 1;

    for (page, text) in parts {
        if *page != current_page {
            pieces.push(format!("\n--- Page {page} ---\n"));
            current_page = *page;
        }
        pieces.push(text.clone());
    }

    pieces.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{BoundingBox, VisibilityCategory};

    fn span(page: u32, text: &str) -> TextSpan {
        TextSpan::new(text, page, BoundingBox::new(72.0, 72.0, 200.0, 84.0))
    }

    fn fixture() -> (Vec<TextSpan>, Vec<VisibilityVerdict>) {
        let spans = vec![span(1, "visible intro"), span(1, "ghost payload"), span(2, "closing")];
        let verdicts = vec![
            VisibilityVerdict::new(0, 1, VisibilityCategory::Visible, Vec::new(), None),
            VisibilityVerdict::new(1, 1, VisibilityCategory::Invisible, Vec::new(), Some(1.0)),
            VisibilityVerdict::new(2, 2, VisibilityCategory::Visible, Vec::new(), None),
        ];
        (spans, verdicts)
    }

    #[test]
    fn test_strip_removes_hidden_spans() {
        let (spans, verdicts) = fixture();
        let report = sanitize(&spans, &verdicts, SanitizeStrategy::Strip);

        assert_eq!(report.original_span_count, 3);
        assert_eq!(report.sanitized_span_count, 2);
        assert_eq!(report.removed_count, 1);
        assert_eq!(report.flagged_count, 0);
        assert_eq!(report.removed_text_sample, vec!["ghost payload".to_string()]);
        assert!(!report.safe_text.contains("ghost payload"));
        assert!(report.safe_text.contains("visible intro"));
    }

    #[test]
    fn test_flag_marks_hidden_spans() {
        let (spans, verdicts) = fixture();
        let report = sanitize(&spans, &verdicts, SanitizeStrategy::Flag);

        assert_eq!(report.removed_count, 0);
        assert_eq!(report.flagged_count, 1);
        assert_eq!(report.sanitized_span_count, 3);
        assert!(report.safe_text.contains("[HIDDEN] ghost payload"));
    }

    #[test]
    fn test_preserve_keeps_everything() {
        let (spans, verdicts) = fixture();
        let report = sanitize(&spans, &verdicts, SanitizeStrategy::Preserve);

        assert_eq!(report.removed_count, 0);
        assert_eq!(report.flagged_count, 0);
        assert!(report.safe_text.contains("ghost payload"));
        assert!(!report.safe_text.contains(FLAG_PREFIX));
    }

    #[test]
    fn test_page_breaks_are_marked() {
        let (spans, verdicts) = fixture();
        let report = sanitize(&spans, &verdicts, SanitizeStrategy::Strip);

        assert!(report.safe_text.contains("--- Page 2 ---"));
    }

    #[test]
    fn test_removed_sample_is_bounded() {
        let spans: Vec<TextSpan> = (0..10).map(|i| span(1, &format!("hidden {i}"))).collect();
        let verdicts: Vec<VisibilityVerdict> = (0..10)
            .map(|i| {
                VisibilityVerdict::new(i, 1, VisibilityCategory::Invisible, Vec::new(), Some(1.0))
            })
            .collect();

        let report = sanitize(&spans, &verdicts, SanitizeStrategy::Strip);
        assert_eq!(report.removed_count, 10);
        assert_eq!(report.removed_text_sample.len(), REMOVED_SAMPLE_LIMIT);
    }

    #[test]
    fn test_adaptive_strategy_by_risk_level() {
        assert_eq!(
            SanitizeStrategy::for_risk_level(RiskLevel::Critical, SanitizeStrategy::Preserve),
            SanitizeStrategy::Strip
        );
        assert_eq!(
            SanitizeStrategy::for_risk_level(RiskLevel::Medium, SanitizeStrategy::Preserve),
            SanitizeStrategy::Flag
        );
        assert_eq!(
            SanitizeStrategy::for_risk_level(RiskLevel::Safe, SanitizeStrategy::Preserve),
            SanitizeStrategy::Preserve
        );
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("strip".parse(), Ok(SanitizeStrategy::Strip));
        assert_eq!("flag".parse(), Ok(SanitizeStrategy::Flag));
        assert_eq!("preserve".parse(), Ok(SanitizeStrategy::Preserve));
        assert!("shred".parse::<SanitizeStrategy>().is_err());
    }
}
