//! Line-layout engine
//!
//! Walks the Markdown source line by line and produces positioned draw
//! instructions on a paginated canvas. Coordinates are millimetres from the
//! top-left corner of the page; `y` is the text baseline.

use super::classify::{classify, source_lines, LineKind};
use super::metrics::{text_width, FontFamily, FontWeight};
use crate::config::LayoutConfig;

/// Prefix drawn in front of bullet items
pub const BULLET_PREFIX: &str = "\u{2022} ";

/// Page geometry and typography used for one layout run
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub line_height: f64,
    pub bullet_indent: f64,
    pub title_spacing: f64,
    pub title: String,
    pub title_font_size: f32,
    pub body_font_size: f32,
}

impl PageGeometry {
    /// Width available between the left and right margins
    pub fn usable_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    /// Lowest baseline allowed before breaking to a new page
    pub fn bottom_limit(&self) -> f64 {
        self.height - self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::from(&LayoutConfig::default())
    }
}

impl From<&LayoutConfig> for PageGeometry {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            width: config.page_width,
            height: config.page_height,
            margin: config.margin,
            line_height: config.line_height,
            bullet_indent: config.bullet_indent,
            title_spacing: config.title_spacing,
            title: config.title.clone(),
            title_font_size: config.title_font_size,
            body_font_size: config.body_font_size,
        }
    }
}

/// A concrete font selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub family: FontFamily,
    pub weight: FontWeight,
    pub size: f32,
}

impl Font {
    pub fn normal(size: f32) -> Self {
        Self {
            family: FontFamily::Helvetica,
            weight: FontWeight::Normal,
            size,
        }
    }

    pub fn bold(size: f32) -> Self {
        Self {
            family: FontFamily::Helvetica,
            weight: FontWeight::Bold,
            size,
        }
    }

    /// Rendered width of `text` in this font, in millimetres
    pub fn measure(&self, text: &str) -> f64 {
        text_width(text, self.family, self.weight, self.size)
    }
}

/// One step for the PDF backend
#[derive(Debug, Clone, PartialEq)]
pub enum DrawInstruction {
    /// Select the font for subsequent text
    SetFont(Font),
    /// Draw text with its baseline starting at (x, y)
    DrawText { text: String, x: f64, y: f64 },
    /// Start a new page
    AddPage,
}

/// Result of laying out a document
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub instructions: Vec<DrawInstruction>,
    pub page_count: usize,
}

#[cfg(test)]
impl Layout {
    /// Number of page breaks
    pub fn page_breaks(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| matches!(i, DrawInstruction::AddPage))
            .count()
    }

    /// Every drawn string with the font it is drawn in and its page index
    pub fn texts(&self) -> Vec<PlacedText<'_>> {
        let mut font = None;
        let mut page = 0;
        let mut placed = Vec::new();
        for instruction in &self.instructions {
            match instruction {
                DrawInstruction::SetFont(f) => font = Some(*f),
                DrawInstruction::AddPage => page += 1,
                DrawInstruction::DrawText { text, x, y } => placed.push(PlacedText {
                    text,
                    x: *x,
                    y: *y,
                    font,
                    page,
                }),
            }
        }
        placed
    }
}

/// A drawn string as the backend will see it
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedText<'a> {
    pub text: &'a str,
    pub x: f64,
    pub y: f64,
    pub font: Option<Font>,
    pub page: usize,
}

/// Transient cursor state for a single layout run
struct LayoutCursor<'g> {
    geometry: &'g PageGeometry,
    y: f64,
    font: Option<Font>,
    page: usize,
    out: Vec<DrawInstruction>,
}

impl<'g> LayoutCursor<'g> {
    fn new(geometry: &'g PageGeometry) -> Self {
        Self {
            geometry,
            y: geometry.margin,
            font: None,
            page: 0,
            out: Vec::new(),
        }
    }

    fn set_font(&mut self, font: Font) {
        if self.font != Some(font) {
            self.font = Some(font);
            self.out.push(DrawInstruction::SetFont(font));
        }
    }

    fn current_font(&self) -> Font {
        self.font
            .unwrap_or_else(|| Font::normal(self.geometry.body_font_size))
    }

    fn draw(&mut self, text: &str, x: f64) {
        self.out.push(DrawInstruction::DrawText {
            text: text.to_string(),
            x,
            y: self.y,
        });
    }

    /// Move down and break the page if the cursor left the printable area
    fn advance(&mut self, dy: f64) {
        self.y += dy;
        self.break_if_needed();
    }

    fn break_if_needed(&mut self) {
        if self.y > self.geometry.bottom_limit() {
            self.out.push(DrawInstruction::AddPage);
            self.page += 1;
            self.y = self.geometry.margin;
        }
    }

    /// Draw `text`, greedily wrapping on whitespace to `max_width`
    fn draw_wrapped(&mut self, text: &str, x: f64, max_width: f64) {
        let font = self.current_font();
        let line_height = self.geometry.line_height;

        if font.measure(text) <= max_width {
            self.draw(text, x);
            self.advance(line_height);
            return;
        }

        let mut line = String::new();
        for word in text.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };

            if !line.is_empty() && font.measure(&candidate) > max_width {
                self.break_if_needed();
                self.draw(&line, x);
                self.advance(line_height);
                line = word.to_string();
            } else {
                line = candidate;
            }
        }

        if !line.is_empty() {
            self.break_if_needed();
            self.draw(&line, x);
            self.advance(line_height);
        }
    }

    fn place(&mut self, kind: LineKind<'_>) {
        let geometry = self.geometry;
        match kind {
            LineKind::Heading { level, text } => {
                let size = match level {
                    1 => 16.0,
                    2 => 14.0,
                    _ => 12.0,
                };
                self.set_font(Font::bold(size));
                self.draw(text, geometry.margin);
                self.advance(geometry.line_height);
            }
            LineKind::Bullet(text) => {
                self.set_font(Font::normal(geometry.body_font_size));
                let item = format!("{}{}", BULLET_PREFIX, text);
                self.draw_wrapped(
                    &item,
                    geometry.margin + geometry.bullet_indent,
                    geometry.usable_width() - geometry.bullet_indent,
                );
            }
            LineKind::Fence => self.advance(geometry.line_height),
            LineKind::Blank => self.advance(geometry.line_height / 2.0),
            LineKind::Paragraph(text) => {
                self.set_font(Font::normal(geometry.body_font_size));
                self.draw_wrapped(text, geometry.margin, geometry.usable_width());
            }
        }
    }

    fn finish(self) -> Layout {
        Layout {
            instructions: self.out,
            page_count: self.page + 1,
        }
    }
}

/// Lay out `text` on pages described by `geometry`
pub fn layout_document(text: &str, geometry: &PageGeometry) -> Layout {
    let mut cursor = LayoutCursor::new(geometry);

    cursor.set_font(Font::bold(geometry.title_font_size));
    cursor.draw(&geometry.title, geometry.margin);
    cursor.y = geometry.margin + geometry.title_spacing;

    let cursor = source_lines(text)
        .map(classify)
        .fold(cursor, |mut cursor, kind| {
            cursor.place(kind);
            cursor
        });

    let layout = cursor.finish();
    log::debug!(
        "Laid out {} instructions over {} page(s)",
        layout.instructions.len(),
        layout.page_count
    );
    layout
}
