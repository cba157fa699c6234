//! WCAG 2.1 color math: sRGB linearization, relative luminance, contrast.
//!
//! Reference: https://www.w3.org/WAI/WCAG21/Understanding/contrast-minimum.html

use shared_types::RgbColor;

/// Convert one sRGB channel (0.0-1.0) to linear RGB.
fn srgb_to_linear(channel: f64) -> f64 {
    if channel <= 0.03928 {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance of a color, 0.0 (black) to 1.0 (white).
///
/// The channel weights account for human eye sensitivity to red, green, and
/// blue light.
pub fn relative_luminance(color: RgbColor) -> f64 {
    let r = srgb_to_linear(f64::from(color.r) / 255.0);
    let g = srgb_to_linear(f64::from(color.g) / 255.0);
    let b = srgb_to_linear(f64::from(color.b) / 255.0);

    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// WCAG contrast ratio between two colors, 1.0 to 21.0.
///
/// Order-independent: the lighter luminance always goes in the numerator,
/// so the ratio is >= 1.0 regardless of which argument is the foreground.
pub fn contrast_ratio(a: RgbColor, b: RgbColor) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);

    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };

    (lighter + 0.05) / (darker + 0.05)
}
