pub mod aggregator;
pub mod classifier;
pub mod color;
pub mod config;
pub mod patterns;
pub mod sanitize;

pub use config::EngineConfig;
pub use sanitize::{SanitizeReport, SanitizeStrategy};

use shared_types::{PageGeometries, RiskAssessment, TextSpan, VisibilityVerdict};

/// Everything one analysis run produces: the per-span verdict list and the
/// document-level assessment built from it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DocumentAnalysis {
    pub verdicts: Vec<VisibilityVerdict>,
    pub assessment: RiskAssessment,
}

/// VisibilityEngine entry point. Stateless apart from its injected
/// configuration; safe to share across concurrent document workers.
pub struct VisibilityEngine {
    config: EngineConfig,
}

impl VisibilityEngine {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Classify every span, scan hidden text for injection patterns, and
    /// aggregate the document-level risk. Pure and synchronous.
    pub fn analyze(&self, spans: &[TextSpan], pages: &PageGeometries) -> DocumentAnalysis {
        let verdicts: Vec<VisibilityVerdict> = spans
            .iter()
            .enumerate()
            .map(|(index, span)| {
                classifier::classify(index, span, pages.get(span.page_number), &self.config)
            })
            .collect();

        let scan_input = if self.config.scan_visible_text {
            join_texts(spans.iter())
        } else {
            join_texts(
                verdicts
                    .iter()
                    .filter(|v| v.is_hidden)
                    .filter_map(|v| spans.get(v.span_index)),
            )
        };
        let matches = patterns::scan(&scan_input);

        let assessment = aggregator::aggregate(spans, &verdicts, &matches, &self.config);

        tracing::debug!(
            total_spans = assessment.total_spans,
            hidden_spans = assessment.hidden_spans,
            score = assessment.score,
            "document analyzed"
        );
        if assessment.prompt_injection_detected {
            tracing::warn!(
                patterns = ?assessment.prompt_injection_patterns,
                "prompt-injection phrasing found in hidden text"
            );
        }

        DocumentAnalysis {
            verdicts,
            assessment,
        }
    }

    /// Convenience wrapper: analyze and sanitize in one pass, picking the
    /// strategy adaptively from the document's risk level.
    pub fn sanitize(
        &self,
        spans: &[TextSpan],
        pages: &PageGeometries,
        default_strategy: SanitizeStrategy,
    ) -> (DocumentAnalysis, SanitizeReport) {
        let analysis = self.analyze(spans, pages);
        let strategy =
            SanitizeStrategy::for_risk_level(analysis.assessment.level, default_strategy);
        let report = sanitize::sanitize(spans, &analysis.verdicts, strategy);
        (analysis, report)
    }
}

impl Default for VisibilityEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn join_texts<'a>(spans: impl Iterator<Item = &'a TextSpan>) -> String {
    spans.map(|s| s.text.as_str()).collect::<Vec<_>>().join("\n")
}
