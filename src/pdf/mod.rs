//! PDF export for Markdown documents
//!
//! The raw Markdown (not the rendered preview) is laid out line by line
//! by [`layout`] and serialized by [`writer`]:
//! - `classify`: prefix-based line classification
//! - `metrics`: Helvetica advance widths
//! - `layout`: the paginating line-layout engine
//! - `writer`: the `pdf-writer` backend

pub mod classify;
pub mod layout;
pub mod metrics;
pub mod writer;

pub use classify::{classify, LineKind};
pub use layout::{layout_document, DrawInstruction, Font, Layout, PageGeometry};
pub use metrics::{FontFamily, FontWeight};
pub use writer::{write_pdf, PdfMetadata};

use crate::config::LayoutConfig;
use crate::error::{ExportError, ExportResult};
use crate::file_handler::write_file_atomic;
use std::path::{Path, PathBuf};

/// Outcome of a successful export
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub page_count: usize,
    pub size_bytes: usize,
}

/// Lays out and serializes documents with a fixed page geometry
pub struct PdfExporter {
    geometry: PageGeometry,
}

impl PdfExporter {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            geometry: PageGeometry::from(config),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Render a document to PDF bytes, returning them with the page count
    pub fn render(&self, markdown: &str) -> ExportResult<(Vec<u8>, usize)> {
        let layout = layout_document(markdown, &self.geometry);
        let metadata = PdfMetadata::new(self.geometry.title.clone());
        let bytes = write_pdf(&layout, &self.geometry, &metadata)?;
        Ok((bytes, layout.page_count))
    }

    /// Render a document and write it to `path`.
    ///
    /// Nothing is written unless rendering succeeds, and the file is
    /// replaced atomically.
    pub fn export_to_file(&self, markdown: &str, path: &Path) -> ExportResult<ExportSummary> {
        if path.as_os_str().is_empty() || path.is_dir() {
            return Err(ExportError::InvalidPath(path.to_path_buf()));
        }

        let (bytes, page_count) = self.render(markdown)?;
        write_file_atomic(path, &bytes)?;

        log::info!(
            "Exported {} page(s) to {}",
            page_count,
            path.display()
        );
        Ok(ExportSummary {
            path: path.to_path_buf(),
            page_count,
            size_bytes: bytes.len(),
        })
    }
}
