//! Application core
//!
//! `App` is the single owner of the document. The editor input, the preview
//! and the export/copy actions all go through it by reference, one message
//! at a time.

use crate::clipboard::{copy_preview, ClipboardBackend};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::file_handler::{read_file, FileWatcher, WatchEvent, WatcherConfig};
use crate::markdown::{HtmlDocumentExporter, HtmlExportOptions, PreviewRenderer, RenderedPreview};
use crate::message::{Message, Notification};
use crate::pdf::{layout_document, PdfExporter};
use crate::state::{ContentStore, StateStorage};
use crate::utils::text;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Summary figures for the current document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentStats {
    pub lines: usize,
    pub words: usize,
    pub pdf_pages: usize,
}

/// Application state and action routing
pub struct App<S: StateStorage, C: ClipboardBackend> {
    config: Config,
    store: ContentStore<S>,
    clipboard: C,
    renderer: PreviewRenderer,
    exporter: PdfExporter,
}

impl<S: StateStorage, C: ClipboardBackend> App<S, C> {
    /// Open the document from `storage`, replacing a blank one with the default
    pub fn new(config: Config, storage: S, clipboard: C) -> Self {
        let mut store = ContentStore::open(storage);
        if let Err(e) = store.initialize() {
            log::warn!("Default document could not be saved: {}", e);
        }

        Self {
            renderer: PreviewRenderer::with_config(&config.preview),
            exporter: PdfExporter::new(&config.layout),
            config,
            store,
            clipboard,
        }
    }

    /// Current document
    pub fn content(&self) -> &str {
        self.store.get()
    }

    #[cfg(test)]
    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Render the preview pane
    pub fn preview(&self) -> RenderedPreview {
        self.renderer.render(self.store.get())
    }

    /// Preview HTML, either as a fragment or as a complete page
    pub fn preview_html(&self, standalone: bool) -> String {
        if standalone {
            let options = HtmlExportOptions {
                include_toc: self.config.preview.include_toc,
                ..Default::default()
            };
            HtmlDocumentExporter::new(&self.renderer).export_html(self.store.get(), &options)
        } else {
            self.renderer.render_html(self.store.get())
        }
    }

    /// Line, word and PDF page counts
    pub fn stats(&self) -> DocumentStats {
        let content = self.store.get();
        DocumentStats {
            lines: text::line_count(content),
            words: text::word_count(content),
            pdf_pages: layout_document(content, self.exporter.geometry()).page_count,
        }
    }

    /// Handle one user action
    pub fn update(&mut self, message: Message) -> Notification {
        match message {
            Message::Edit(text) => match self.store.set(text) {
                Ok(()) => Notification::info("Document updated."),
                Err(e) => self.fail("Failed to save document", e.into()),
            },
            Message::Reset => match self.store.reset() {
                Ok(()) => Notification::info("Document reset to the default content."),
                Err(e) => self.fail("Failed to reset document", e.into()),
            },
            Message::Copy => self.handle_copy(),
            Message::Export(path) => self.handle_export(path),
            Message::SavePreview { path, standalone } => self.handle_save_preview(&path, standalone),
        }
    }

    fn handle_copy(&mut self) -> Notification {
        let preview = self.preview();
        match copy_preview(&mut self.clipboard, &preview) {
            Ok(()) => Notification::info("Content copied to clipboard!"),
            Err(e) => self.fail("Failed to copy", e.into()),
        }
    }

    fn handle_export(&mut self, path: Option<PathBuf>) -> Notification {
        let path = path.unwrap_or_else(|| PathBuf::from(&self.config.export.file_name));
        match self.exporter.export_to_file(self.store.get(), &path) {
            Ok(summary) => {
                log::debug!("PDF size: {} bytes", summary.size_bytes);
                Notification::info(format!(
                    "Exported {} page(s) to {}",
                    summary.page_count,
                    summary.path.display()
                ))
            }
            Err(e) => self.fail("Error exporting to PDF", e.into()),
        }
    }

    fn handle_save_preview(&mut self, path: &Path, standalone: bool) -> Notification {
        let html = self.preview_html(standalone);
        match crate::file_handler::write_file_atomic(path, html.as_bytes()) {
            Ok(()) => Notification::info(format!("Preview written to {}", path.display())),
            Err(e) => self.fail("Failed to write preview", e.into()),
        }
    }

    fn fail(&self, context: &str, error: AppError) -> Notification {
        log::error!("{}: {}", context, error);
        Notification::error(error.user_message())
    }

    /// Load `source` into the document and refresh the preview at `output`.
    ///
    /// Returns whether the document changed.
    pub fn sync_from_file(&mut self, source: &Path, output: &Path) -> AppResult<bool> {
        let read = read_file(source)?;
        let changed = read.content != self.store.get();
        if changed {
            self.store.set(read.content)?;
        }

        let html = self.preview_html(true);
        crate::file_handler::write_file_atomic(output, html.as_bytes())?;
        log::info!("Preview of {} refreshed", source.display());
        Ok(changed)
    }

    /// Live preview: re-render `output` whenever `source` changes.
    ///
    /// Runs until `keep_running` returns false or the watcher stops.
    pub fn run_live_preview(
        &mut self,
        source: &Path,
        output: &Path,
        mut keep_running: impl FnMut() -> bool,
    ) -> AppResult<()> {
        let mut watcher = FileWatcher::new(WatcherConfig {
            debounce_ms: self.config.watch.debounce_ms,
        })?;
        watcher.watch(source)?;
        self.sync_from_file(source, output)?;

        let tick = Duration::from_millis(self.config.watch.debounce_ms.max(50));
        while keep_running() {
            for event in watcher.poll(tick)? {
                match event {
                    WatchEvent::FileCreated(_) | WatchEvent::FileModified(_) => {
                        if let Err(e) = self.sync_from_file(source, output) {
                            log::error!("Live preview update failed: {}", e);
                        }
                    }
                    WatchEvent::FileDeleted(path) => {
                        log::warn!("{} was removed; keeping the last preview", path.display());
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::RecordingClipboard;
    use crate::message::NotificationLevel;
    use crate::state::{MemoryStorage, DEFAULT_CONTENT, STORAGE_KEY};

    fn app() -> App<MemoryStorage, RecordingClipboard> {
        App::new(Config::default(), MemoryStorage::new(), RecordingClipboard::default())
    }

    #[test]
    fn test_new_app_starts_with_default_document() {
        let blank = serde_json::json!({ "state": { "content": "  " }, "version": 1 });
        let storage = MemoryStorage::with_item(STORAGE_KEY, &blank.to_string());
        let app = App::new(Config::default(), storage, RecordingClipboard::default());
        assert_eq!(app.content(), DEFAULT_CONTENT);
    }

    #[test]
    fn test_read_only_storage_still_opens() {
        let blank = serde_json::json!({ "state": { "content": "" }, "version": 1 });
        let mut storage = MemoryStorage::with_item(STORAGE_KEY, &blank.to_string());
        storage.set_read_only(true);

        let mut app = App::new(Config::default(), storage, RecordingClipboard::default());
        assert_eq!(app.content(), DEFAULT_CONTENT);

        let note = app.update(Message::Edit("# Mine".to_string()));
        assert!(note.is_error());
        assert_eq!(app.content(), DEFAULT_CONTENT);
    }

    #[test]
    fn test_edit_and_reset() {
        let mut app = app();
        let note = app.update(Message::Edit("# Mine".to_string()));
        assert_eq!(note.level, NotificationLevel::Info);
        assert_eq!(app.content(), "# Mine");

        app.update(Message::Reset);
        assert_eq!(app.content(), DEFAULT_CONTENT);
    }

    #[test]
    fn test_copy_uses_rendered_preview() {
        let mut app = app();
        app.update(Message::Edit("# Title\n\nbody".to_string()));

        let note = app.update(Message::Copy);
        assert_eq!(note.message, "Content copied to clipboard!");

        let (html, text) = &app.clipboard().items[0];
        assert!(html.contains("<h1>Title</h1>"));
        assert_eq!(text, "Title\n\nbody");
    }

    #[test]
    fn test_copy_failure_is_notified_and_state_kept() {
        let clipboard = RecordingClipboard {
            deny: true,
            ..Default::default()
        };
        let mut app = App::new(Config::default(), MemoryStorage::new(), clipboard);

        let note = app.update(Message::Copy);
        assert!(note.is_error());
        assert_eq!(note.message, "Failed to copy content.");
        assert_eq!(app.content(), DEFAULT_CONTENT);
    }

    #[test]
    fn test_export_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markdown-export.pdf");
        let mut app = app();

        let note = app.update(Message::Export(Some(path.clone())));
        assert!(!note.is_error(), "{}", note);
        assert!(note.message.contains("1 page(s)"));
        assert!(path.exists());
    }

    #[test]
    fn test_export_failure_produces_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("markdown-export.pdf");
        let mut app = app();

        let note = app.update(Message::Export(Some(path.clone())));
        assert!(note.is_error());
        assert_eq!(note.message, "Failed to export to PDF.");
        assert!(!path.exists());
    }

    #[test]
    fn test_save_preview_standalone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.html");
        let mut app = app();

        let note = app.update(Message::SavePreview {
            path: path.clone(),
            standalone: true,
        });
        assert!(!note.is_error());
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<h1>Hello, Markdown!</h1>"));
    }

    #[test]
    fn test_sync_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("notes.md");
        let output = dir.path().join("notes.html");
        std::fs::write(&source, "# Notes\n\nfirst").unwrap();
        let mut app = app();

        assert!(app.sync_from_file(&source, &output).unwrap());
        assert_eq!(app.content(), "# Notes\n\nfirst");
        assert!(std::fs::read_to_string(&output).unwrap().contains("<p>first</p>"));

        assert!(!app.sync_from_file(&source, &output).unwrap());
    }

    #[test]
    fn test_stats() {
        let mut app = app();
        app.update(Message::Edit("# One two\nthree".to_string()));
        assert_eq!(
            app.stats(),
            DocumentStats {
                lines: 2,
                words: 4,
                pdf_pages: 1
            }
        );
    }
}
