//! File handler module for Markdown Desk
//!
//! Handles all file system operations including:
//! - Reading files with encoding detection
//! - Atomic writes for persisted state and exports
//! - File watching for the live preview

pub mod io;
pub mod watcher;

pub use io::*;
pub use watcher::*;
