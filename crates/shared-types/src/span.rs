use std::collections::BTreeMap;

/// 8-bit RGB color as extracted from a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor { r: 0, g: 0, b: 0 };
    pub const WHITE: RgbColor = RgbColor {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Span bounding box in page coordinate units (points).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BoundingBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// All four coordinates are finite numbers. Extractors occasionally emit
    /// NaN/infinite boxes for degenerate content streams.
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// Visible page area, in points.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
}

impl PageGeometry {
    /// US Letter, 612x792pt.
    pub const US_LETTER: PageGeometry = PageGeometry {
        width: 612.0,
        height: 792.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::US_LETTER
    }
}

/// Per-page geometry bounds for a document, with a fallback for pages the
/// extractor reported no MediaBox for.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct PageGeometries {
    pages: BTreeMap<u32, PageGeometry>,
    fallback: PageGeometry,
}

impl PageGeometries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(fallback: PageGeometry) -> Self {
        Self {
            pages: BTreeMap::new(),
            fallback,
        }
    }

    pub fn insert(&mut self, page_number: u32, geometry: PageGeometry) {
        self.pages.insert(page_number, geometry);
    }

    pub fn get(&self, page_number: u32) -> PageGeometry {
        self.pages.get(&page_number).copied().unwrap_or(self.fallback)
    }
}

/// A contiguous run of extracted text with the styling metadata needed to
/// assess human visibility. Optional fields are absent when the source
/// extractor could not determine them (plain-text fallback spans carry no
/// color or font metadata).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextSpan {
    pub text: String,
    /// 1-indexed page number.
    pub page_number: u32,
    pub bbox: BoundingBox,
    /// Font size in points.
    pub font_size: Option<f64>,
    pub font_color: Option<RgbColor>,
    pub background_color: Option<RgbColor>,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, page_number: u32, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            page_number,
            bbox,
            font_size: None,
            font_color: None,
            background_color: None,
        }
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_colors(mut self, font: RgbColor, background: RgbColor) -> Self {
        self.font_color = Some(font);
        self.background_color = Some(background);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bbox_finite_detection() {
        assert!(BoundingBox::new(0.0, 0.0, 10.0, 10.0).is_finite());
        assert!(!BoundingBox::new(f64::NAN, 0.0, 10.0, 10.0).is_finite());
        assert!(!BoundingBox::new(0.0, f64::INFINITY, 10.0, 10.0).is_finite());
    }

    #[test]
    fn test_page_geometry_fallback() {
        let mut pages = PageGeometries::new();
        pages.insert(2, PageGeometry::new(595.0, 842.0));

        assert_eq!(pages.get(2), PageGeometry::new(595.0, 842.0));
        assert_eq!(pages.get(1), PageGeometry::US_LETTER);
    }

    #[test]
    fn test_span_builder_metadata() {
        let span = TextSpan::new("hello", 1, BoundingBox::new(0.0, 0.0, 20.0, 12.0))
            .with_font_size(12.0)
            .with_colors(RgbColor::BLACK, RgbColor::WHITE);

        assert_eq!(span.font_size, Some(12.0));
        assert_eq!(span.font_color, Some(RgbColor::BLACK));
        assert_eq!(span.background_color, Some(RgbColor::WHITE));
    }

    #[test]
    fn test_span_serializes_absent_metadata_as_null() {
        let span = TextSpan::new("x", 1, BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        let json = serde_json::to_value(&span).unwrap();

        assert!(json["font_size"].is_null());
        assert!(json["font_color"].is_null());
    }
}
