//! Plain-text report rendering for terminal output.

use std::fmt::Write;

use shared_types::{DocumentStatus, ScanResponse};

/// Render the scan response as a human-readable report.
pub fn render_text_report(response: &ScanResponse, verbose: bool) -> String {
    let mut out = String::new();

    let status = match response.status {
        DocumentStatus::Safe => "SAFE",
        DocumentStatus::Suspicious => "SUSPICIOUS",
    };
    let _ = writeln!(out, "Status: {status}");
    let _ = writeln!(
        out,
        "Risk: {} (score {}/100)",
        response.risk_level, response.risk_score
    );
    let _ = writeln!(
        out,
        "Spans: {} total, {} hidden",
        response.total_spans, response.hidden_spans
    );

    if response.prompt_injection {
        let _ = writeln!(
            out,
            "WARNING: prompt injection detected ({} pattern{})",
            response.prompt_injection_patterns.len(),
            if response.prompt_injection_patterns.len() == 1 {
                ""
            } else {
                "s"
            }
        );
        if verbose {
            for pattern in &response.prompt_injection_patterns {
                let _ = writeln!(out, "  pattern: {pattern}");
            }
        }
    }

    if !response.issues.is_empty() {
        let _ = writeln!(out, "Issues:");
        for issue in &response.issues {
            let _ = writeln!(
                out,
                "  [page {}] {}: '{}'",
                issue.page, issue.severity, issue.text
            );
            if verbose {
                for reason in &issue.reasons {
                    let _ = writeln!(out, "      - {reason}");
                }
            }
        }
    }

    out
}
