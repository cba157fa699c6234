//! Engine configuration.
//!
//! Every classification threshold and aggregation floor is injected here
//! rather than hard-coded, so deployments can tighten or relax the engine
//! without a code change. Loadable from a TOML file.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Thresholds consumed by the classifier and the risk aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Contrast ratio below which a span is flagged low-contrast (default 3.0).
    #[serde(default = "default_contrast_threshold")]
    pub contrast_threshold: f64,
    /// Contrast ratio below which a span is effectively invisible (default 1.5).
    #[serde(default = "default_invisible_contrast")]
    pub invisible_contrast: f64,
    /// Font size in points below which text is unreadable (default 1.0).
    #[serde(default = "default_microscopic_font_size")]
    pub microscopic_font_size: f64,
    /// Font size in points below which text is very hard to read (default 4.0).
    #[serde(default = "default_small_font_size")]
    pub small_font_size: f64,
    /// Invisible-span count at which the score floors at HIGH (default 2).
    #[serde(default = "default_invisible_threshold")]
    pub invisible_threshold: usize,
    /// Hidden-span count at which the score floors at MEDIUM (default 5).
    #[serde(default = "default_suspicious_threshold")]
    pub suspicious_threshold: usize,
    /// Scan visible span text for injection patterns too (default false,
    /// matching hidden-text-only scanning).
    #[serde(default)]
    pub scan_visible_text: bool,
}

fn default_contrast_threshold() -> f64 {
    3.0
}

fn default_invisible_contrast() -> f64 {
    1.5
}

fn default_microscopic_font_size() -> f64 {
    1.0
}

fn default_small_font_size() -> f64 {
    4.0
}

fn default_invisible_threshold() -> usize {
    2
}

fn default_suspicious_threshold() -> usize {
    5
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            contrast_threshold: default_contrast_threshold(),
            invisible_contrast: default_invisible_contrast(),
            microscopic_font_size: default_microscopic_font_size(),
            small_font_size: default_small_font_size(),
            invisible_threshold: default_invisible_threshold(),
            suspicious_threshold: default_suspicious_threshold(),
            scan_visible_text: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string. Missing fields take their
    /// documented defaults.
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }
}
