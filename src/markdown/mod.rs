//! Markdown module for Markdown Desk
//!
//! Handles rendering of the document for the preview pane:
//! - HTML fragments with highlighted code (`preview`)
//! - Plain text for the clipboard (`preview`)
//! - Standalone HTML pages (`export`)

pub mod export;
pub mod preview;

pub use export::{HtmlDocumentExporter, HtmlExportOptions};
pub use preview::{PreviewRenderer, RenderedPreview};
