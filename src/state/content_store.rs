//! The document store
//!
//! Holds the single piece of mutable editor state, the raw Markdown text,
//! and persists it through a [`StateStorage`] so it survives restarts.

use super::storage::StateStorage;
use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};

/// Storage key the document lives under
pub const STORAGE_KEY: &str = "markdown-storage";

/// Schema version of the persisted state
pub const STATE_VERSION: u32 = 1;

/// Document shown on first start and after a reset
pub const DEFAULT_CONTENT: &str = r##"# Hello, Markdown!

Type your markdown here and see it rendered in real-time.

## Features

- Real-time preview
- Export to PDF
- Copy to clipboard

```js
console.log("This is a code block");
```"##;

/// On-disk envelope: `{"state": {"content": ...}, "version": 1}`
#[derive(Debug, Serialize, Deserialize)]
struct PersistedState {
    state: PersistedContent,
    version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedContent {
    content: String,
}

/// Owner of the Markdown document
///
/// There is exactly one writer: whoever holds the store mutably.
#[derive(Debug)]
pub struct ContentStore<S: StateStorage> {
    content: String,
    storage: S,
}

impl<S: StateStorage> ContentStore<S> {
    /// Open the store, hydrating the document from storage
    pub fn open(storage: S) -> Self {
        let content = Self::hydrate(&storage).unwrap_or_else(|| DEFAULT_CONTENT.to_string());
        Self { content, storage }
    }

    fn hydrate(storage: &S) -> Option<String> {
        let raw = storage.get_item(STORAGE_KEY)?;

        let persisted: PersistedState = match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("Stored state under {} is unreadable: {}", STORAGE_KEY, e);
                return None;
            }
        };

        if persisted.version != STATE_VERSION {
            log::warn!(
                "State version {} could not be migrated to version {}; using defaults",
                persisted.version,
                STATE_VERSION
            );
            return None;
        }

        Some(persisted.state.content)
    }

    /// Replace an empty or whitespace-only document with the default one.
    ///
    /// Returns whether a reset happened. The default is in place even when
    /// persisting it fails.
    pub fn initialize(&mut self) -> StoreResult<bool> {
        if !self.content.trim().is_empty() {
            return Ok(false);
        }
        log::info!("No content found, using default content");
        self.content = DEFAULT_CONTENT.to_string();
        self.persist(DEFAULT_CONTENT)?;
        Ok(true)
    }

    /// Current document
    pub fn get(&self) -> &str {
        &self.content
    }

    /// Replace the document. Any string is accepted.
    ///
    /// The new value is persisted first; on failure the document is unchanged.
    pub fn set(&mut self, content: impl Into<String>) -> StoreResult<()> {
        let content = content.into();
        self.persist(&content)?;
        self.content = content;
        Ok(())
    }

    /// Restore the default document
    pub fn reset(&mut self) -> StoreResult<()> {
        self.set(DEFAULT_CONTENT)
    }

    fn persist(&mut self, content: &str) -> StoreResult<()> {
        let envelope = PersistedState {
            state: PersistedContent {
                content: content.to_string(),
            },
            version: STATE_VERSION,
        };
        let json = serde_json::to_string(&envelope)?;
        self.storage
            .set_item(STORAGE_KEY, &json)
            .map_err(|source| StoreError::Persist {
                key: STORAGE_KEY.to_string(),
                source,
            })
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{FileStorage, MemoryStorage};

    fn stored(content: &str, version: u32) -> MemoryStorage {
        let json = serde_json::json!({ "state": { "content": content }, "version": version });
        MemoryStorage::with_item(STORAGE_KEY, &json.to_string())
    }

    #[test]
    fn test_missing_state_uses_default() {
        let store = ContentStore::open(MemoryStorage::new());
        assert_eq!(store.get(), DEFAULT_CONTENT);
    }

    #[test]
    fn test_reset_restores_default_exactly() {
        for text in ["", "   ", "# Custom", "anything\nat all"] {
            let mut store = ContentStore::open(MemoryStorage::new());
            store.set(text).unwrap();
            store.reset().unwrap();
            assert_eq!(store.get(), DEFAULT_CONTENT);
        }
    }

    #[test]
    fn test_initialize_replaces_blank_content() {
        for blank in ["", " ", "\n\t  \n"] {
            let mut store = ContentStore::open(stored(blank, 1));
            assert_eq!(store.get(), blank);
            assert!(store.initialize().unwrap());
            assert_eq!(store.get(), DEFAULT_CONTENT);
        }
    }

    #[test]
    fn test_initialize_keeps_real_content() {
        for text in ["x", "  # Notes  ", "\n\nbody"] {
            let mut store = ContentStore::open(stored(text, 1));
            assert!(!store.initialize().unwrap());
            assert_eq!(store.get(), text);
        }
    }

    #[test]
    fn test_initialize_keeps_default_when_persist_fails() {
        let mut storage = stored("  ", 1);
        storage.set_read_only(true);
        let mut store = ContentStore::open(storage);

        assert!(matches!(
            store.initialize(),
            Err(StoreError::Persist { .. })
        ));
        assert_eq!(store.get(), DEFAULT_CONTENT);
    }

    #[test]
    fn test_unknown_version_is_not_migrated() {
        let store = ContentStore::open(stored("# From the future", 2));
        assert_eq!(store.get(), DEFAULT_CONTENT);
    }

    #[test]
    fn test_corrupt_state_uses_default() {
        let store = ContentStore::open(MemoryStorage::with_item(STORAGE_KEY, "{ nope"));
        assert_eq!(store.get(), DEFAULT_CONTENT);
    }

    #[test]
    fn test_set_persists_envelope() {
        let mut store = ContentStore::open(MemoryStorage::new());
        store.set("# Saved").unwrap();

        let raw = store.storage().get_item(STORAGE_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["state"]["content"], "# Saved");
        assert_eq!(value["version"], 1);
    }

    #[test]
    fn test_failed_set_leaves_content_unchanged() {
        let mut storage = stored("# Before", 1);
        storage.set_read_only(true);
        let mut store = ContentStore::open(storage);

        let err = store.set("# After").unwrap_err();
        assert!(matches!(err, StoreError::Persist { .. }));
        assert_eq!(store.get(), "# Before");
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = ContentStore::open(FileStorage::new(dir.path()));
            store.set("# Persisted\n\nacross sessions").unwrap();
        }
        let store = ContentStore::open(FileStorage::new(dir.path()));
        assert_eq!(store.get(), "# Persisted\n\nacross sessions");
    }
}
