//! Key/value storage backends for persisted editor state
//!
//! Mirrors the browser local storage contract: string keys, string values,
//! absent keys read as `None`.

use crate::config::Config;
use crate::error::{FileResult, StoreError, StoreResult};
use crate::file_handler::{ensure_dir, write_file_atomic};
use std::path::{Path, PathBuf};

/// A string key/value store that survives process restarts
pub trait StateStorage {
    /// Read a value; missing or unreadable keys yield `None`
    fn get_item(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one
    fn set_item(&mut self, key: &str, value: &str) -> FileResult<()>;
}

/// Storage keeping one JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir` (created lazily on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage in the platform data directory
    pub fn open_default() -> StoreResult<Self> {
        let dir = Config::data_dir().map_err(|_| StoreError::DirectoryError)?;
        Ok(Self::new(dir))
    }

    /// Directory holding the stored keys
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing a key
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StateStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("Could not read stored state {}: {}", path.display(), e);
                None
            }
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> FileResult<()> {
        ensure_dir(&self.dir)?;
        write_file_atomic(self.path_for(key), value.as_bytes())
    }
}

/// In-process storage for tests
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: std::collections::HashMap<String, String>,
    read_only: bool,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a single item
    pub fn with_item(key: &str, value: &str) -> Self {
        let mut items = std::collections::HashMap::new();
        items.insert(key.to_string(), value.to_string());
        Self {
            items,
            read_only: false,
        }
    }

    /// Make every write fail, as a full or locked storage would
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }
}

#[cfg(test)]
impl StateStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> FileResult<()> {
        if self.read_only {
            return Err(crate::error::FileError::WriteError {
                path: PathBuf::from(key),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "storage is read-only"),
            });
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
