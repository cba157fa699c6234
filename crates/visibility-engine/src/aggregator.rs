//! Document-level risk aggregation.
//!
//! Weights, floors, and score bands are data, not control flow: the tables
//! below pin every boundary the scorer can produce.

use std::collections::BTreeMap;

use shared_types::{Issue, RiskAssessment, RiskLevel, TextSpan, VisibilityCategory, VisibilityVerdict};

use crate::config::EngineConfig;

/// Per-span severity weights, most severe first.
const CATEGORY_WEIGHTS: &[(VisibilityCategory, u32)] = &[
    (VisibilityCategory::Invisible, 15),
    (VisibilityCategory::Microscopic, 12),
    (VisibilityCategory::Offscreen, 10),
    (VisibilityCategory::LowContrast, 6),
    (VisibilityCategory::Small, 4),
];

/// Cap on any single category's accumulated contribution, so one repeated
/// trick cannot saturate the score on its own.
const CATEGORY_CONTRIBUTION_CAP: u32 = 60;

/// Score bands: (inclusive upper bound, level).
const SCORE_BANDS: &[(u8, RiskLevel)] = &[
    (0, RiskLevel::Safe),
    (29, RiskLevel::Low),
    (59, RiskLevel::Medium),
    (84, RiskLevel::High),
    (100, RiskLevel::Critical),
];

/// Floor applied when the invisible-span count reaches the configured
/// threshold; 60 is the bottom of the HIGH band.
const HIGH_SCORE_FLOOR: u8 = 60;

/// Floor applied when the hidden-span count reaches the configured
/// threshold; 30 is the bottom of the MEDIUM band.
const MEDIUM_SCORE_FLOOR: u8 = 30;

/// A matched injection pattern outranks any span-weight arithmetic.
const INJECTION_SCORE_FLOOR: u8 = 70;

fn category_weight(category: VisibilityCategory) -> u32 {
    CATEGORY_WEIGHTS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, w)| *w)
        .unwrap_or(0)
}

/// Map a score to its risk level via the band table.
pub fn level_for_score(score: u8) -> RiskLevel {
    SCORE_BANDS
        .iter()
        .find(|(upper, _)| score <= *upper)
        .map(|(_, level)| *level)
        .unwrap_or(RiskLevel::Critical)
}

/// Aggregate per-span verdicts and pattern matches into one document-level
/// assessment. Deterministic: identical inputs always produce identical
/// output. An empty span list is vacuously safe, not an error.
pub fn aggregate(
    spans: &[TextSpan],
    verdicts: &[VisibilityVerdict],
    pattern_matches: &[&str],
    config: &EngineConfig,
) -> RiskAssessment {
    if verdicts.is_empty() {
        return RiskAssessment::empty();
    }

    let hidden: Vec<&VisibilityVerdict> = verdicts.iter().filter(|v| v.is_hidden).collect();
    let hidden_count = hidden.len();
    let invisible_count = hidden
        .iter()
        .filter(|v| v.category == VisibilityCategory::Invisible)
        .count();

    // Weighted base score with per-category caps.
    let mut contributions: BTreeMap<VisibilityCategory, u32> = BTreeMap::new();
    for verdict in &hidden {
        *contributions.entry(verdict.category).or_default() += category_weight(verdict.category);
    }
    let weighted: u32 = contributions
        .values()
        .map(|w| (*w).min(CATEGORY_CONTRIBUTION_CAP))
        .sum();
    let mut score = weighted.min(100) as u8;

    // Count-based floors, lower bounds only.
    if invisible_count >= config.invisible_threshold {
        score = score.max(HIGH_SCORE_FLOOR);
    }
    if hidden_count >= config.suspicious_threshold {
        score = score.max(MEDIUM_SCORE_FLOOR);
    }

    // Dominant rule: a pattern match is a stronger signal than any span
    // weighting.
    if !pattern_matches.is_empty() {
        score = score.max(INJECTION_SCORE_FLOOR);
    }

    // Issues grouped by ascending page; verdicts arrive in span order, so
    // in-page ordering is preserved.
    let mut by_page: BTreeMap<u32, Vec<Issue>> = BTreeMap::new();
    for verdict in &hidden {
        let text = spans
            .get(verdict.span_index)
            .map(|s| s.text.clone())
            .unwrap_or_default();
        by_page.entry(verdict.page).or_default().push(Issue {
            page: verdict.page,
            category: verdict.category,
            text,
            reasons: verdict.reasons.clone(),
        });
    }
    let issues: Vec<Issue> = by_page.into_values().flatten().collect();

    RiskAssessment {
        score,
        level: level_for_score(score),
        total_spans: verdicts.len(),
        hidden_spans: hidden_count,
        issues,
        prompt_injection_patterns: pattern_matches.iter().map(|p| p.to_string()).collect(),
        prompt_injection_detected: !pattern_matches.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::BoundingBox;

    fn span(page: u32, text: &str) -> TextSpan {
        TextSpan::new(text, page, BoundingBox::new(72.0, 72.0, 200.0, 84.0))
    }

    fn verdict(index: usize, page: u32, category: VisibilityCategory) -> VisibilityVerdict {
        VisibilityVerdict::new(index, page, category, Vec::new(), None)
    }

    #[test]
    fn test_empty_document_is_safe() {
        let assessment = aggregate(&[], &[], &[], &EngineConfig::default());

        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.level, RiskLevel::Safe);
        assert_eq!(assessment.total_spans, 0);
        assert_eq!(assessment.hidden_spans, 0);
    }

    #[test]
    fn test_all_visible_document_is_safe() {
        let spans: Vec<TextSpan> = (0..45).map(|i| span(1, &format!("s{i}"))).collect();
        let verdicts: Vec<VisibilityVerdict> = (0..45)
            .map(|i| verdict(i, 1, VisibilityCategory::Visible))
            .collect();

        let assessment = aggregate(&spans, &verdicts, &[], &EngineConfig::default());
        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.level, RiskLevel::Safe);
        assert_eq!(assessment.total_spans, 45);
        assert_eq!(assessment.hidden_spans, 0);
        assert!(!assessment.prompt_injection_detected);
    }

    #[test]
    fn test_score_band_edges() {
        assert_eq!(level_for_score(0), RiskLevel::Safe);
        assert_eq!(level_for_score(1), RiskLevel::Low);
        assert_eq!(level_for_score(29), RiskLevel::Low);
        assert_eq!(level_for_score(30), RiskLevel::Medium);
        assert_eq!(level_for_score(59), RiskLevel::Medium);
        assert_eq!(level_for_score(60), RiskLevel::High);
        assert_eq!(level_for_score(84), RiskLevel::High);
        assert_eq!(level_for_score(85), RiskLevel::Critical);
        assert_eq!(level_for_score(100), RiskLevel::Critical);
    }

    #[test]
    fn test_single_low_contrast_span_scores_low() {
        let spans = vec![span(1, "visible"), span(1, "faint")];
        let verdicts = vec![
            verdict(0, 1, VisibilityCategory::Visible),
            verdict(1, 1, VisibilityCategory::LowContrast),
        ];

        let assessment = aggregate(&spans, &verdicts, &[], &EngineConfig::default());
        assert_eq!(assessment.score, 6);
        assert_eq!(assessment.level, RiskLevel::Low);
        assert_eq!(assessment.hidden_spans, 1);
    }

    #[test]
    fn test_invisible_count_floors_score_at_high() {
        // Two invisible spans weigh only 30, but the count floor lifts them
        // into the HIGH band.
        let spans = vec![span(1, "a"), span(1, "b")];
        let verdicts = vec![
            verdict(0, 1, VisibilityCategory::Invisible),
            verdict(1, 1, VisibilityCategory::Invisible),
        ];

        let assessment = aggregate(&spans, &verdicts, &[], &EngineConfig::default());
        assert_eq!(assessment.score, 60);
        assert_eq!(assessment.level, RiskLevel::High);
    }

    #[test]
    fn test_many_weak_spans_floor_at_medium() {
        // Six low-contrast spans: weighted 36, already MEDIUM, and the
        // hidden-count floor guarantees at least 30 regardless of weights.
        let spans: Vec<TextSpan> = (0..6).map(|i| span(1, &format!("s{i}"))).collect();
        let verdicts: Vec<VisibilityVerdict> = (0..6)
            .map(|i| verdict(i, 1, VisibilityCategory::LowContrast))
            .collect();

        let assessment = aggregate(&spans, &verdicts, &[], &EngineConfig::default());
        assert!(assessment.score >= MEDIUM_SCORE_FLOOR);
        assert!(assessment.level >= RiskLevel::Medium);
    }

    #[test]
    fn test_floors_never_lower_a_higher_weighted_score() {
        // Five invisible + one microscopic: weighted 60 (capped) + 12 = 72.
        let spans: Vec<TextSpan> = (0..6).map(|i| span(1, &format!("s{i}"))).collect();
        let mut verdicts: Vec<VisibilityVerdict> = (0..5)
            .map(|i| verdict(i, 1, VisibilityCategory::Invisible))
            .collect();
        verdicts.push(verdict(5, 1, VisibilityCategory::Microscopic));

        let assessment = aggregate(&spans, &verdicts, &[], &EngineConfig::default());
        assert_eq!(assessment.score, 72);
        assert_eq!(assessment.level, RiskLevel::High);
    }

    #[test]
    fn test_pattern_match_forces_high() {
        let spans = vec![span(1, "ok")];
        let verdicts = vec![verdict(0, 1, VisibilityCategory::Visible)];

        let assessment = aggregate(
            &spans,
            &verdicts,
            &["ignore-instructions"],
            &EngineConfig::default(),
        );
        assert_eq!(assessment.score, INJECTION_SCORE_FLOOR);
        assert_eq!(assessment.level, RiskLevel::High);
        assert!(assessment.prompt_injection_detected);
        assert_eq!(
            assessment.prompt_injection_patterns,
            vec!["ignore-instructions".to_string()]
        );
    }

    #[test]
    fn test_adding_a_hidden_span_never_decreases_score() {
        let config = EngineConfig::default();
        let categories = [
            VisibilityCategory::Small,
            VisibilityCategory::LowContrast,
            VisibilityCategory::Offscreen,
            VisibilityCategory::Microscopic,
            VisibilityCategory::Invisible,
        ];

        for base_count in 0..12 {
            for extra in categories {
                let mut spans: Vec<TextSpan> =
                    (0..base_count).map(|i| span(1, &format!("s{i}"))).collect();
                let mut verdicts: Vec<VisibilityVerdict> = (0..base_count)
                    .map(|i| verdict(i, 1, VisibilityCategory::LowContrast))
                    .collect();
                let before = aggregate(&spans, &verdicts, &[], &config).score;

                spans.push(span(1, "extra"));
                verdicts.push(verdict(base_count, 1, extra));
                let after = aggregate(&spans, &verdicts, &[], &config).score;

                assert!(after >= before, "{extra:?} after {base_count} spans");
            }
        }
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let spans = vec![span(1, "a"), span(2, "b"), span(2, "c")];
        let verdicts = vec![
            verdict(0, 1, VisibilityCategory::Invisible),
            verdict(1, 2, VisibilityCategory::Small),
            verdict(2, 2, VisibilityCategory::Offscreen),
        ];
        let matches = ["system-prompt"];
        let config = EngineConfig::default();

        let first = aggregate(&spans, &verdicts, &matches, &config);
        let second = aggregate(&spans, &verdicts, &matches, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_issues_grouped_by_page_in_span_order() {
        let spans = vec![
            span(2, "second page first"),
            span(1, "first page"),
            span(2, "second page last"),
        ];
        let verdicts = vec![
            verdict(0, 2, VisibilityCategory::LowContrast),
            verdict(1, 1, VisibilityCategory::Invisible),
            verdict(2, 2, VisibilityCategory::Small),
        ];

        let assessment = aggregate(&spans, &verdicts, &[], &EngineConfig::default());
        let order: Vec<(u32, &str)> = assessment
            .issues
            .iter()
            .map(|i| (i.page, i.text.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (1, "first page"),
                (2, "second page first"),
                (2, "second page last"),
            ]
        );
    }

    #[test]
    fn test_hidden_count_never_exceeds_total() {
        let spans: Vec<TextSpan> = (0..4).map(|i| span(1, &format!("s{i}"))).collect();
        let verdicts: Vec<VisibilityVerdict> = (0..4)
            .map(|i| verdict(i, 1, VisibilityCategory::Invisible))
            .collect();

        let assessment = aggregate(&spans, &verdicts, &[], &EngineConfig::default());
        assert!(assessment.hidden_spans <= assessment.total_spans);
    }
}
