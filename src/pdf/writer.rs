//! PDF backend
//!
//! Executes draw instructions with `pdf-writer`. Text uses the standard
//! Helvetica faces with WinAnsi encoding, so nothing is embedded.

use super::layout::{DrawInstruction, Font, Layout, PageGeometry};
use super::metrics::{winansi_byte, FontWeight, MM_PER_PT};
use crate::error::{ExportError, ExportResult};
use chrono::{Datelike, Timelike};
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

const REGULAR_FONT: Name<'static> = Name(b"F1");
const BOLD_FONT: Name<'static> = Name(b"F2");

/// Document-level metadata written to the info dictionary
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    pub title: String,
    pub producer: String,
    pub created: chrono::DateTime<chrono::Utc>,
}

impl PdfMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            producer: format!("Markdown Desk {}", env!("CARGO_PKG_VERSION")),
            created: chrono::Utc::now(),
        }
    }
}

fn to_pt(mm: f64) -> f32 {
    (mm / MM_PER_PT) as f32
}

/// Encode text as WinAnsi bytes; unmappable characters become `?`
pub fn to_winansi(text: &str) -> Vec<u8> {
    text.chars().map(winansi_byte).collect()
}

fn check_coordinate(value: f64, what: &str) -> ExportResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ExportError::Layout(format!("{} coordinate is not finite", what)))
    }
}

/// Turn the instruction stream into one content stream per page
fn build_pages(layout: &Layout, geometry: &PageGeometry) -> ExportResult<Vec<Vec<u8>>> {
    let page_height_pt = to_pt(geometry.height);
    let mut pages = Vec::with_capacity(layout.page_count);
    let mut content = Content::new();
    let mut font: Option<Font> = None;

    for instruction in &layout.instructions {
        match instruction {
            DrawInstruction::SetFont(f) => font = Some(*f),
            DrawInstruction::AddPage => {
                let finished = std::mem::replace(&mut content, Content::new());
                pages.push(finished.finish().to_vec());
            }
            DrawInstruction::DrawText { text, x, y } => {
                let font = font.ok_or_else(|| {
                    ExportError::Layout("text drawn before a font was selected".to_string())
                })?;
                check_coordinate(*x, "x")?;
                check_coordinate(*y, "y")?;

                let name = match font.weight {
                    FontWeight::Normal => REGULAR_FONT,
                    FontWeight::Bold => BOLD_FONT,
                };
                let bytes = to_winansi(text);
                content
                    .begin_text()
                    .set_font(name, font.size)
                    .next_line(to_pt(*x), page_height_pt - to_pt(*y))
                    .show(Str(&bytes))
                    .end_text();
            }
        }
    }
    pages.push(content.finish().to_vec());

    if pages.len() != layout.page_count {
        return Err(ExportError::Layout(format!(
            "layout reported {} pages but produced {}",
            layout.page_count,
            pages.len()
        )));
    }
    Ok(pages)
}

/// Serialize a layout into PDF bytes
pub fn write_pdf(
    layout: &Layout,
    geometry: &PageGeometry,
    metadata: &PdfMetadata,
) -> ExportResult<Vec<u8>> {
    let page_streams = build_pages(layout, geometry)?;

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();
    let regular_id = alloc();
    let bold_id = alloc();
    let page_ids: Vec<Ref> = page_streams.iter().map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = page_streams.iter().map(|_| alloc()).collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    let family = super::metrics::FontFamily::Helvetica;
    pdf.type1_font(regular_id)
        .base_font(Name(family.base_font(FontWeight::Normal).as_bytes()))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(family.base_font(FontWeight::Bold).as_bytes()))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    let media_box = Rect::new(0.0, 0.0, to_pt(geometry.width), to_pt(geometry.height));
    for (page_id, content_id) in page_ids.iter().zip(&content_ids) {
        let mut page = pdf.page(*page_id);
        page.media_box(media_box)
            .parent(pages_id)
            .contents(*content_id);
        {
            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            fonts.pair(REGULAR_FONT, regular_id);
            fonts.pair(BOLD_FONT, bold_id);
        }
    }

    for (content_id, raw) in content_ids.iter().zip(&page_streams) {
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw, 6);
        pdf.stream(*content_id, &compressed)
            .filter(Filter::FlateDecode);
    }

    let created = metadata.created;
    let date = Date::new(created.year().clamp(0, 9999) as u16)
        .month(created.month() as u8)
        .day(created.day() as u8)
        .hour(created.hour() as u8)
        .minute(created.minute() as u8)
        .second(created.second() as u8)
        .utc_offset_hour(0);
    pdf.document_info(info_id)
        .title(TextStr(&metadata.title))
        .producer(TextStr(&metadata.producer))
        .creation_date(date);

    let bytes = pdf.finish();
    log::debug!(
        "Serialized {} page(s) into {} bytes",
        page_ids.len(),
        bytes.len()
    );
    Ok(bytes)
}
