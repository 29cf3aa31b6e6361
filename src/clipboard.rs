//! Clipboard integration for copying the rendered preview
//!
//! The preview is copied as one clipboard item carrying both an HTML and a
//! plain-text flavour. Uses the arboard crate for cross-platform access.

use crate::error::ClipboardError;
use crate::markdown::RenderedPreview;

/// Something that can hold a dual-format clipboard item
pub trait ClipboardBackend {
    /// Replace the clipboard with `html`, offering `plain` as the text alternative
    fn write_html(&mut self, html: &str, plain: &str) -> Result<(), ClipboardError>;
}

/// Whether a write keeps serving the item until another owner replaces it.
///
/// X11 and Wayland selections live in the writing process and vanish when
/// its last handle is dropped, so a short-lived process must wait.
const SERVE_UNTIL_REPLACED: bool = cfg!(target_os = "linux");

/// The operating system clipboard
///
/// arboard's Clipboard is not Send/Sync on all platforms, so a handle is
/// opened per operation.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

fn map_arboard_error(error: arboard::Error) -> ClipboardError {
    match error {
        arboard::Error::ClipboardNotSupported => ClipboardError::Unsupported,
        arboard::Error::ClipboardOccupied => ClipboardError::AccessDenied(error.to_string()),
        other => ClipboardError::WriteError(other.to_string()),
    }
}

impl ClipboardBackend for SystemClipboard {
    fn write_html(&mut self, html: &str, plain: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| match e {
            arboard::Error::ClipboardNotSupported => ClipboardError::Unsupported,
            other => ClipboardError::AccessDenied(other.to_string()),
        })?;
        set_html(&mut clipboard, html, plain).map_err(map_arboard_error)
    }
}

#[cfg(target_os = "linux")]
fn set_html(
    clipboard: &mut arboard::Clipboard,
    html: &str,
    plain: &str,
) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;

    if !SERVE_UNTIL_REPLACED {
        return clipboard.set_html(html, Some(plain));
    }
    log::info!("Serving clipboard contents until another application replaces them");
    clipboard.set().wait().html(html, Some(plain))
}

#[cfg(not(target_os = "linux"))]
fn set_html(
    clipboard: &mut arboard::Clipboard,
    html: &str,
    plain: &str,
) -> Result<(), arboard::Error> {
    debug_assert!(!SERVE_UNTIL_REPLACED);
    clipboard.set_html(html, Some(plain))
}

/// Copy a rendered preview to the clipboard
pub fn copy_preview(
    backend: &mut impl ClipboardBackend,
    preview: &RenderedPreview,
) -> Result<(), ClipboardError> {
    backend.write_html(&preview.html, &preview.text)?;
    log::debug!(
        "Copied {} bytes of HTML and {} bytes of text",
        preview.html.len(),
        preview.text.len()
    );
    Ok(())
}

/// Clipboard stand-in that records what was written
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    pub items: Vec<(String, String)>,
    pub deny: bool,
}

#[cfg(test)]
impl ClipboardBackend for RecordingClipboard {
    fn write_html(&mut self, html: &str, plain: &str) -> Result<(), ClipboardError> {
        if self.deny {
            return Err(ClipboardError::AccessDenied("denied by test".to_string()));
        }
        self.items.push((html.to_string(), plain.to_string()));
        Ok(())
    }
}
