//! File system watcher for the live preview loop
//!
//! Watches the directories holding edited files (editors often replace a
//! file by renaming over it, so watching the file itself is unreliable) and
//! reports debounced changes to the files of interest.

use crate::error::WatcherError;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

/// Events from the file watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A watched file was created or replaced
    FileCreated(PathBuf),

    /// A watched file was modified
    FileModified(PathBuf),

    /// A watched file was deleted
    FileDeleted(PathBuf),
}

impl WatchEvent {
    /// Path the event refers to
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::FileCreated(p) | WatchEvent::FileModified(p) | WatchEvent::FileDeleted(p) => p,
        }
    }
}

/// Configuration for the file watcher
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Debounce interval in milliseconds
    pub debounce_ms: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self { debounce_ms: 200 }
    }
}

/// Manages file system watching
pub struct FileWatcher {
    /// The underlying notify watcher
    watcher: RecommendedWatcher,

    /// Receiver for events from the notify thread
    event_rx: Receiver<notify::Result<Event>>,

    /// Files of interest, keyed by name within their watched directory
    watched_files: HashMap<PathBuf, HashSet<OsString>>,

    /// Pending events for debouncing
    debouncer: EventDebouncer,
}

impl FileWatcher {
    /// Create a new file watcher
    pub fn new(config: WatcherConfig) -> Result<Self, WatcherError> {
        let (tx, rx) = channel();

        let watcher_config =
            Config::default().with_poll_interval(Duration::from_millis(config.debounce_ms));

        let watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            watcher_config,
        )
        .map_err(|e| WatcherError::InitError(e.to_string()))?;

        Ok(Self {
            watcher,
            event_rx: rx,
            watched_files: HashMap::new(),
            debouncer: EventDebouncer::new(config.debounce_ms),
        })
    }

    /// Watch a file for changes
    pub fn watch(&mut self, path: impl AsRef<Path>) -> Result<(), WatcherError> {
        let path = path.as_ref();
        let (dir, name) = split_watch_target(path);

        if !self.watched_files.contains_key(&dir) {
            self.watcher
                .watch(&dir, RecursiveMode::NonRecursive)
                .map_err(|source| WatcherError::WatchError {
                    path: dir.clone(),
                    source,
                })?;
            log::debug!("Watching directory {}", dir.display());
        }

        self.watched_files.entry(dir).or_default().insert(name);
        Ok(())
    }

    /// Check if watching a specific file
    pub fn is_watching(&self, path: impl AsRef<Path>) -> bool {
        let (dir, name) = split_watch_target(path.as_ref());
        self.watched_files
            .get(&dir)
            .map(|names| names.contains(&name))
            .unwrap_or(false)
    }

    /// Wait up to `timeout` for events and return those past the debounce window
    pub fn poll(&mut self, timeout: Duration) -> Result<Vec<WatchEvent>, WatcherError> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(result) => self.ingest(result),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Err(WatcherError::Disconnected),
        }

        while let Ok(result) = self.event_rx.try_recv() {
            self.ingest(result);
        }

        Ok(self.debouncer.get_ready())
    }

    fn ingest(&mut self, result: notify::Result<Event>) {
        match result {
            Ok(event) => {
                for watch_event in self.convert_event(event) {
                    self.debouncer.add(watch_event);
                }
            }
            Err(e) => log::warn!("File watcher error: {}", e),
        }
    }

    /// Convert notify event to our event type, keeping only watched files
    fn convert_event(&self, event: Event) -> Vec<WatchEvent> {
        let kind = event.kind;
        event
            .paths
            .into_iter()
            .filter(|path| self.is_watching(path))
            .filter_map(|path| match kind {
                EventKind::Create(_) => Some(WatchEvent::FileCreated(path)),
                EventKind::Modify(_) => Some(WatchEvent::FileModified(path)),
                EventKind::Remove(_) => Some(WatchEvent::FileDeleted(path)),
                _ => None,
            })
            .collect()
    }
}

/// Split a file path into the directory to watch and the file name to match
fn split_watch_target(path: &Path) -> (PathBuf, OsString) {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let name = absolute
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    let dir = absolute
        .parent()
        .map(|p| p.canonicalize().unwrap_or_else(|_| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    (dir, name)
}

/// Simple debouncer for event processing
pub struct EventDebouncer {
    /// Pending paths with their last event time
    pending: HashMap<PathBuf, (WatchEvent, Instant)>,

    /// Debounce duration
    debounce_duration: Duration,
}

impl EventDebouncer {
    /// Create a new debouncer
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            pending: HashMap::new(),
            debounce_duration: Duration::from_millis(debounce_ms),
        }
    }

    /// Add an event, replacing any pending event for the same path
    pub fn add(&mut self, event: WatchEvent) {
        let path = event.path().to_path_buf();
        self.pending.insert(path, (event, Instant::now()));
    }

    /// Get events that have passed the debounce period
    pub fn get_ready(&mut self) -> Vec<WatchEvent> {
        let now = Instant::now();
        let ready: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, (_, time))| now.duration_since(*time) >= self.debounce_duration)
            .map(|(path, _)| path.clone())
            .collect();

        ready
            .into_iter()
            .filter_map(|path| self.pending.remove(&path))
            .map(|(event, _)| event)
            .collect()
    }

    /// Check if there are pending events
    #[cfg(test)]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_debouncer() {
        let mut debouncer = EventDebouncer::new(100);

        debouncer.add(WatchEvent::FileModified(PathBuf::from("/test.md")));
        assert!(debouncer.has_pending());

        let ready = debouncer.get_ready();
        assert!(ready.is_empty());

        std::thread::sleep(Duration::from_millis(150));
        let ready = debouncer.get_ready();
        assert_eq!(ready.len(), 1);
        assert!(!debouncer.has_pending());
    }

    #[test]
    fn test_debouncer_keeps_latest_event_per_path() {
        let mut debouncer = EventDebouncer::new(0);
        debouncer.add(WatchEvent::FileModified(PathBuf::from("/a.md")));
        debouncer.add(WatchEvent::FileDeleted(PathBuf::from("/a.md")));

        let ready = debouncer.get_ready();
        assert_eq!(ready, vec![WatchEvent::FileDeleted(PathBuf::from("/a.md"))]);
    }

    #[test]
    fn test_watch_registers_file_in_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.md");
        std::fs::write(&file, "# Notes").unwrap();

        let mut watcher = FileWatcher::new(WatcherConfig::default()).unwrap();
        watcher.watch(&file).unwrap();

        assert!(watcher.is_watching(&file));
        assert!(!watcher.is_watching(dir.path().join("other.md")));
    }
}
