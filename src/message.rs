//! Application message types
//!
//! Every user action is a message handed to [`crate::app::App::update`],
//! which answers with a notification for the user.

use std::fmt;
use std::path::PathBuf;

/// Main application message enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Replace the document with new text (editor pane input)
    Edit(String),

    /// Restore the default document
    Reset,

    /// Copy the rendered preview to the clipboard
    Copy,

    /// Export the document as PDF; `None` uses the configured file name
    Export(Option<PathBuf>),

    /// Write the rendered preview to a file
    SavePreview {
        path: PathBuf,
        /// Wrap the fragment into a complete HTML page
        standalone: bool,
    },
}

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Message shown to the user after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
