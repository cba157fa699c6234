/// Visibility classification for a single text span.
///
/// Variants are declared in ascending severity order so the derived `Ord`
/// ranks `Invisible > Microscopic > Offscreen > LowContrast > Small`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisibilityCategory {
    Visible,
    Small,
    LowContrast,
    Offscreen,
    Microscopic,
    Invisible,
}

impl std::fmt::Display for VisibilityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            VisibilityCategory::Visible => "VISIBLE",
            VisibilityCategory::Small => "SMALL",
            VisibilityCategory::LowContrast => "LOW_CONTRAST",
            VisibilityCategory::Offscreen => "OFFSCREEN",
            VisibilityCategory::Microscopic => "MICROSCOPIC",
            VisibilityCategory::Invisible => "INVISIBLE",
        })
    }
}

/// Per-span visibility verdict. Created once by the classifier and never
/// mutated; refers back to the originating span by index into the analyzed
/// span slice.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisibilityVerdict {
    pub span_index: usize,
    pub page: u32,
    pub category: VisibilityCategory,
    pub reasons: Vec<String>,
    pub is_hidden: bool,
    pub contrast_ratio: Option<f64>,
}

impl VisibilityVerdict {
    pub fn new(
        span_index: usize,
        page: u32,
        category: VisibilityCategory,
        reasons: Vec<String>,
        contrast_ratio: Option<f64>,
    ) -> Self {
        Self {
            span_index,
            page,
            category,
            reasons,
            is_hidden: category != VisibilityCategory::Visible,
            contrast_ratio,
        }
    }
}
