//! PDF text-span extraction.
//!
//! Interprets each page's content stream directly: text positioning and
//! sizing operators give span geometry, fill-color operators give the text
//! color, and painted rectangles give the background behind a span. This is
//! deliberately a coarse interpreter — glyph metrics are estimated at half
//! an em per character, and the CTM is not tracked — but it preserves
//! exactly the metadata the visibility classifier cares about.
//!
//! When a document yields no spans at all (scanned or exotic encodings),
//! extraction falls back to plain text; fallback spans carry no color or
//! font metadata.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};
use shared_types::{BoundingBox, PageGeometries, PageGeometry, RgbColor, TextSpan};

use crate::error::ExtractError;

/// Average glyph advance as a fraction of the font size.
const GLYPH_WIDTH_EM: f64 = 0.5;

/// Extraction output: spans plus the per-page geometry the classifier needs
/// for offscreen checks.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub spans: Vec<TextSpan>,
    pub pages: PageGeometries,
}

/// Extract text spans with styling metadata from PDF bytes.
pub fn extract_from_bytes(bytes: &[u8]) -> Result<Extraction, ExtractError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractError::ParseError(e.to_string()))?;

    let mut spans = Vec::new();
    let mut pages = PageGeometries::new();

    for (page_number, page_id) in doc.get_pages() {
        if let Some(geometry) = page_geometry(&doc, page_id) {
            pages.insert(page_number, geometry);
        }

        let data = match doc.get_page_content(page_id) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(page = page_number, error = %e, "skipping unreadable page content");
                continue;
            }
        };
        let content = match Content::decode(&data) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(page = page_number, error = %e, "skipping undecodable content stream");
                continue;
            }
        };

        spans.extend(interpret_content(&content, page_number));
    }

    if spans.is_empty() {
        tracing::info!("content streams yielded no text, falling back to plain extraction");
        spans = fallback_plain_text(bytes);
    }

    tracing::debug!(spans = spans.len(), "extracted text spans");
    Ok(Extraction { spans, pages })
}

/// Interpret one page's content stream into text spans.
pub fn interpret_content(content: &Content, page_number: u32) -> Vec<TextSpan> {
    let mut interp = Interpreter::new(page_number);
    for operation in &content.operations {
        interp.apply(operation);
    }
    interp.spans
}

struct Interpreter {
    page_number: u32,
    font_size: f64,
    v_scale: f64,
    x: f64,
    y: f64,
    line_x: f64,
    line_y: f64,
    leading: f64,
    fill_color: RgbColor,
    pending_rects: Vec<BoundingBox>,
    painted_rects: Vec<(BoundingBox, RgbColor)>,
    spans: Vec<TextSpan>,
}

impl Interpreter {
    fn new(page_number: u32) -> Self {
        Self {
            page_number,
            font_size: 0.0,
            v_scale: 1.0,
            x: 0.0,
            y: 0.0,
            line_x: 0.0,
            line_y: 0.0,
            leading: 0.0,
            fill_color: RgbColor::BLACK,
            pending_rects: Vec::new(),
            painted_rects: Vec::new(),
            spans: Vec::new(),
        }
    }

    fn apply(&mut self, operation: &Operation) {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "BT" => {
                self.x = 0.0;
                self.y = 0.0;
                self.line_x = 0.0;
                self.line_y = 0.0;
                self.v_scale = 1.0;
            }
            "Tf" => {
                if let Some(size) = operands.get(1).and_then(number) {
                    self.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(number) {
                    self.leading = leading;
                }
            }
            "Td" | "TD" => {
                if let (Some(tx), Some(ty)) = (
                    operands.first().and_then(number),
                    operands.get(1).and_then(number),
                ) {
                    if operation.operator == "TD" {
                        self.leading = -ty;
                    }
                    self.line_x += tx;
                    self.line_y += ty;
                    self.x = self.line_x;
                    self.y = self.line_y;
                }
            }
            "Tm" => {
                if operands.len() == 6 {
                    let nums: Vec<f64> = operands.iter().filter_map(number).collect();
                    if nums.len() == 6 {
                        let scale = nums[3].abs();
                        self.v_scale = if scale == 0.0 { 1.0 } else { scale };
                        self.line_x = nums[4];
                        self.line_y = nums[5];
                        self.x = self.line_x;
                        self.y = self.line_y;
                    }
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(bytes) = operands.first().and_then(string_bytes) {
                    self.show_text(&decode_pdf_text(bytes));
                }
            }
            "'" => {
                self.next_line();
                if let Some(bytes) = operands.first().and_then(string_bytes) {
                    self.show_text(&decode_pdf_text(bytes));
                }
            }
            "\"" => {
                self.next_line();
                if let Some(bytes) = operands.get(2).and_then(string_bytes) {
                    self.show_text(&decode_pdf_text(bytes));
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let text: String = items
                        .iter()
                        .filter_map(|item| string_bytes(item).map(decode_pdf_text))
                        .collect();
                    self.show_text(&text);
                }
            }
            "rg" => {
                if let Some(color) = rgb_from_operands(operands) {
                    self.fill_color = color;
                }
            }
            "g" => {
                if let Some(gray) = operands.first().and_then(number) {
                    let level = channel_to_byte(gray);
                    self.fill_color = RgbColor::new(level, level, level);
                }
            }
            "k" => {
                if let Some(color) = rgb_from_cmyk(operands) {
                    self.fill_color = color;
                }
            }
            "re" => {
                if operands.len() == 4 {
                    let nums: Vec<f64> = operands.iter().filter_map(number).collect();
                    if nums.len() == 4 {
                        self.pending_rects.push(BoundingBox::new(
                            nums[0],
                            nums[1],
                            nums[0] + nums[2],
                            nums[1] + nums[3],
                        ));
                    }
                }
            }
            "f" | "F" | "f*" | "b" | "b*" | "B" | "B*" => {
                let fill = self.fill_color;
                for rect in self.pending_rects.drain(..) {
                    self.painted_rects.push((rect, fill));
                }
            }
            "S" | "s" | "n" => self.pending_rects.clear(),
            _ => {}
        }
    }

    fn next_line(&mut self) {
        self.line_y -= self.leading;
        self.x = self.line_x;
        self.y = self.line_y;
    }

    fn show_text(&mut self, text: &str) {
        let size = self.font_size * self.v_scale;
        let width = GLYPH_WIDTH_EM * size * text.chars().count() as f64;

        if !text.trim().is_empty() {
            let bbox = BoundingBox::new(self.x, self.y, self.x + width, self.y + size);
            let background = self.background_at(self.x + width / 2.0, self.y + size / 2.0);

            self.spans.push(
                TextSpan::new(text, self.page_number, bbox)
                    .with_font_size(size)
                    .with_colors(self.fill_color, background),
            );
        }

        self.x += width;
    }

    /// Color behind a point: the most recently painted rectangle covering it,
    /// or the paper default.
    fn background_at(&self, x: f64, y: f64) -> RgbColor {
        self.painted_rects
            .iter()
            .rev()
            .find(|(rect, _)| x >= rect.x0 && x <= rect.x1 && y >= rect.y0 && y <= rect.y1)
            .map(|(_, color)| *color)
            .unwrap_or(RgbColor::WHITE)
    }
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

fn string_bytes(obj: &Object) -> Option<&[u8]> {
    match obj {
        Object::String(bytes, _) => Some(bytes),
        _ => None,
    }
}

fn channel_to_byte(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn rgb_from_operands(operands: &[Object]) -> Option<RgbColor> {
    if operands.len() != 3 {
        return None;
    }
    let r = number(&operands[0])?;
    let g = number(&operands[1])?;
    let b = number(&operands[2])?;
    Some(RgbColor::new(
        channel_to_byte(r),
        channel_to_byte(g),
        channel_to_byte(b),
    ))
}

fn rgb_from_cmyk(operands: &[Object]) -> Option<RgbColor> {
    if operands.len() != 4 {
        return None;
    }
    let c = number(&operands[0])?;
    let m = number(&operands[1])?;
    let y = number(&operands[2])?;
    let k = number(&operands[3])?;
    Some(RgbColor::new(
        channel_to_byte((1.0 - c) * (1.0 - k)),
        channel_to_byte((1.0 - m) * (1.0 - k)),
        channel_to_byte((1.0 - y) * (1.0 - k)),
    ))
}

/// Decode a PDF string: UTF-16BE when BOM-prefixed, Latin-1 otherwise.
/// Unprintable control bytes are dropped.
fn decode_pdf_text(bytes: &[u8]) -> String {
    if bytes.starts_with(&[0xFE, 0xFF]) {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
            .chars()
            .filter(|c| !c.is_control())
            .collect()
    } else {
        bytes
            .iter()
            .map(|&b| b as char)
            .filter(|c| !c.is_control())
            .collect()
    }
}

/// MediaBox lookup with Pages-tree inheritance.
fn page_geometry(doc: &Document, page_id: ObjectId) -> Option<PageGeometry> {
    let mut dict = doc.get_object(page_id).ok()?.as_dict().ok()?;

    for _ in 0..32 {
        if let Ok(obj) = dict.get(b"MediaBox") {
            let rect = resolve_array(doc, obj)?;
            let nums: Vec<f64> = rect.iter().filter_map(number).collect();
            if nums.len() == 4 {
                return Some(PageGeometry::new(
                    (nums[2] - nums[0]).abs(),
                    (nums[3] - nums[1]).abs(),
                ));
            }
            return None;
        }

        let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = doc.get_object(parent).ok()?.as_dict().ok()?;
    }

    None
}

fn resolve_array<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Vec<Object>> {
    match obj {
        Object::Array(array) => Some(array),
        Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok(),
        _ => None,
    }
}

/// Last-resort extraction: plain text, one metadata-less span per line.
/// These spans classify as visible with an insufficient-metadata note,
/// which is exactly what a downstream reviewer should see for content we
/// could not style-check.
fn fallback_plain_text(bytes: &[u8]) -> Vec<TextSpan> {
    let text = match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "plain-text fallback failed");
            return Vec::new();
        }
    };

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| {
            let y = 720.0 - (i as f64 * 14.0) % 648.0;
            let width = GLYPH_WIDTH_EM * 12.0 * line.chars().count() as f64;
            TextSpan::new(line, 1, BoundingBox::new(72.0, y, 72.0 + width, y + 12.0))
        })
        .collect()
}
