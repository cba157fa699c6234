//! Prompt-injection pattern catalog.
//!
//! A fixed, inspectable table of known instruction-override phrasings.
//! Compiled once at first use and never mutated; every scan evaluates the
//! whole catalog and reports matches in catalog order.

use lazy_static::lazy_static;
use regex::Regex;

/// Catalog of (identifier, pattern) pairs. All patterns are case-insensitive.
pub const PATTERN_CATALOG: &[(&str, &str)] = &[
    (
        "ignore-instructions",
        r"(?i)\bignore\s+(?:(?:previous|prior|above|all)\s+)+(?:instructions?|prompts?|commands?)\b",
    ),
    (
        "disregard-instructions",
        r"(?i)\bdisregard\s+(?:(?:previous|prior|above|all)\s+)+(?:instructions?|prompts?|commands?)\b",
    ),
    ("disregard-above", r"(?i)\bdisregard\s+the\s+above\b"),
    (
        "forget-context",
        r"(?i)\bforget\s+(?:everything|all|previous|prior|above)\b",
    ),
    ("system-role-marker", r"(?i)\bsystem\s*:"),
    ("assistant-role-marker", r"(?i)\bassistant\s*:"),
    ("user-role-marker", r"(?i)\buser\s*:"),
    ("you-are-now", r"(?i)\byou\s+are\s+now\b"),
    (
        "pretend-persona",
        r"(?i)\bpretend\s+(?:to\s+be|you\s+are)\b",
    ),
    ("act-as", r"(?i)\bact\s+as\s+(?:if|a|an)\b"),
    ("role-marker", r"(?i)\brole\s*:"),
    (
        "new-instructions",
        r"(?i)\bnew\s+(?:instructions?|prompts?|commands?)\b",
    ),
    (
        "override-instructions",
        r"(?i)\boverride\s+(?:previous|settings?|instructions?)\b",
    ),
    ("system-prompt", r"(?i)\bsystem\s+prompt\b"),
    ("debug-mode", r"(?i)\bdebug\s+mode\b"),
];

lazy_static! {
    static ref COMPILED_CATALOG: Vec<(&'static str, Regex)> = PATTERN_CATALOG
        .iter()
        .map(|(id, pattern)| (*id, Regex::new(pattern).expect("static pattern must compile")))
        .collect();
}

/// Scan text against the whole catalog, returning the identifiers of every
/// pattern that matched, in catalog order. Pure function of the input text.
pub fn scan(text: &str) -> Vec<&'static str> {
    COMPILED_CATALOG
        .iter()
        .filter(|(_, regex)| regex.is_match(text))
        .map(|(id, _)| *id)
        .collect()
}
