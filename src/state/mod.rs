//! State management module for Markdown Desk
//!
//! - `content_store`: the persisted Markdown document
//! - `storage`: key/value backends the document is persisted through

mod content_store;
mod storage;

pub use content_store::*;
pub use storage::*;
