//! Error types for Markdown Desk
//!
//! This module defines all custom error types used throughout the application.
//! Error types are organized by category for clear error handling and user-friendly messages.

use std::path::PathBuf;
use thiserror::Error;

/// Main application error type encompassing all error categories
#[derive(Error, Debug)]
pub enum AppError {
    /// File I/O related errors
    #[error(transparent)]
    FileIO(#[from] FileError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Content store errors
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Clipboard errors
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    /// PDF export errors
    #[error(transparent)]
    Export(#[from] ExportError),

    /// File watcher errors
    #[error(transparent)]
    Watcher(#[from] WatcherError),
}

/// File I/O related errors
#[derive(Error, Debug)]
pub enum FileError {
    /// File not found at specified path
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// File is too large
    #[error("File too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Error reading file
    #[error("Could not read file: {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing file
    #[error("Could not save file: {path}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory operation error
    #[error("Directory error: {path}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error loading configuration file
    #[error("Could not load configuration: {0}")]
    LoadError(String),

    /// Error parsing configuration
    #[error("Invalid configuration format: {0}")]
    ParseError(String),

    /// Invalid configuration value
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Configuration directory error
    #[error("Could not access configuration directory")]
    DirectoryError,
}

/// Content store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// The storage backend refused the write
    #[error("Could not persist state under key {key}")]
    Persist {
        key: String,
        #[source]
        source: FileError,
    },

    /// State could not be encoded
    #[error("Could not encode state: {0}")]
    Encode(#[from] serde_json::Error),

    /// No data directory for the storage backend
    #[error("Could not determine data directory")]
    DirectoryError,
}

/// Clipboard related errors
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Could not access clipboard
    #[error("Could not access clipboard: {0}")]
    AccessDenied(String),

    /// Clipboard not available on this platform or session
    #[error("Clipboard is not supported here")]
    Unsupported,

    /// Error setting clipboard content
    #[error("Could not write to clipboard: {0}")]
    WriteError(String),
}

/// PDF export errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// Layout produced something the backend cannot serialize
    #[error("Layout failed: {0}")]
    Layout(String),

    /// Output could not be written
    #[error(transparent)]
    Write(#[from] FileError),

    /// Export target is not usable
    #[error("Invalid export path: {0}")]
    InvalidPath(PathBuf),
}

/// File watcher errors
#[derive(Error, Debug)]
pub enum WatcherError {
    /// Could not initialize file watcher
    #[error("Could not start file watcher: {0}")]
    InitError(String),

    /// Could not watch path
    #[error("Could not watch path: {path}")]
    WatchError {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// Watcher channel closed
    #[error("File watcher stopped unexpectedly")]
    Disconnected,
}

/// Result type alias for operations that can fail with AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for file operations
pub type FileResult<T> = Result<T, FileError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;

impl FileError {
    /// Create a user-friendly error message suitable for display in dialogs
    pub fn user_message(&self) -> String {
        match self {
            FileError::NotFound(_) => {
                "The file could not be found. It may have been moved or deleted.".to_string()
            }
            FileError::FileTooLarge { max_size, .. } => {
                format!(
                    "This file is too large to open. Maximum file size is {} bytes.",
                    max_size
                )
            }
            FileError::WriteError { .. } => {
                "Could not save the file. Check disk space and permissions.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl ClipboardError {
    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        "Failed to copy content.".to_string()
    }
}

impl ExportError {
    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        "Failed to export to PDF.".to_string()
    }
}

impl AppError {
    /// Message shown to the user for a failed action
    pub fn user_message(&self) -> String {
        match self {
            AppError::FileIO(e) => e.user_message(),
            AppError::Clipboard(e) => e.user_message(),
            AppError::Export(e) => e.user_message(),
            AppError::Store(_) => "Could not save the document.".to_string(),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_error_display() {
        let err = FileError::NotFound(PathBuf::from("/test/file.md"));
        assert!(err.to_string().contains("/test/file.md"));
    }

    #[test]
    fn test_export_error_user_message_is_generic() {
        let err = ExportError::Layout("coordinate is not finite".to_string());
        assert_eq!(err.user_message(), "Failed to export to PDF.");
    }

    #[test]
    fn test_clipboard_error_user_message_is_generic() {
        let err = ClipboardError::Unsupported;
        assert_eq!(err.user_message(), "Failed to copy content.");
    }

    #[test]
    fn test_app_error_from_export_error() {
        let app_err: AppError = ExportError::Layout("x".to_string()).into();
        assert!(matches!(app_err, AppError::Export(_)));
        assert_eq!(app_err.user_message(), "Failed to export to PDF.");
    }
}
