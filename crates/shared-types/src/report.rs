use crate::verdict::VisibilityCategory;

/// Document-level risk classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Safe,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        })
    }
}

/// One hidden-text finding, kept in page order within the assessment.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Issue {
    pub page: u32,
    pub category: VisibilityCategory,
    pub text: String,
    pub reasons: Vec<String>,
}

/// Document-level risk assessment produced by the aggregator. Created once
/// per analysis run; owned solely by the caller that requested the analysis.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RiskAssessment {
    /// 0-100.
    pub score: u8,
    pub level: RiskLevel,
    pub total_spans: usize,
    pub hidden_spans: usize,
    pub issues: Vec<Issue>,
    pub prompt_injection_patterns: Vec<String>,
    pub prompt_injection_detected: bool,
}

impl RiskAssessment {
    /// Vacuously safe assessment for an empty document.
    pub fn empty() -> Self {
        Self {
            score: 0,
            level: RiskLevel::Safe,
            total_spans: 0,
            hidden_spans: 0,
            issues: Vec::new(),
            prompt_injection_patterns: Vec::new(),
            prompt_injection_detected: false,
        }
    }
}

/// Coarse document status surfaced to presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Safe,
    Suspicious,
}

/// Issue record as rendered in the JSON response. Text is truncated so a
/// single giant hidden span cannot bloat the report.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IssueRecord {
    pub page: u32,
    pub text: String,
    pub severity: VisibilityCategory,
    pub reasons: Vec<String>,
}

const ISSUE_TEXT_LIMIT: usize = 100;

/// The frozen JSON response schema consumed by the CLI `--json` output and
/// the scan API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScanResponse {
    pub status: DocumentStatus,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub total_spans: usize,
    pub hidden_spans: usize,
    pub issues: Vec<IssueRecord>,
    pub prompt_injection: bool,
    pub prompt_injection_patterns: Vec<String>,
}

impl ScanResponse {
    pub fn from_assessment(assessment: &RiskAssessment) -> Self {
        let status = if assessment.hidden_spans == 0 && !assessment.prompt_injection_detected {
            DocumentStatus::Safe
        } else {
            DocumentStatus::Suspicious
        };

        let issues = assessment
            .issues
            .iter()
            .map(|issue| IssueRecord {
                page: issue.page,
                text: truncate_text(&issue.text, ISSUE_TEXT_LIMIT),
                severity: issue.category,
                reasons: issue.reasons.clone(),
            })
            .collect();

        Self {
            status,
            risk_score: assessment.score,
            risk_level: assessment.level,
            total_spans: assessment.total_spans,
            hidden_spans: assessment.hidden_spans,
            issues,
            prompt_injection: assessment.prompt_injection_detected,
            prompt_injection_patterns: assessment.prompt_injection_patterns.clone(),
        }
    }
}

fn truncate_text(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let mut truncated: String = text.chars().take(limit).collect();
        truncated.push_str("...");
        truncated
    }
}
