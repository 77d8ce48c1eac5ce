//! Event library persisted as a JSON array (iseql_library.json).

use crate::Result;
use crate::diagnostics;
use crate::store::{EventStore, MemoryStore, SavedEvent};

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// File-backed library. Every mutation rewrites the whole file through a
/// temporary sibling and a rename, so readers see either the old library or
/// the new one.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl FileStore {
    /// Open a library file. A missing file is an empty library.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = if path.exists() {
            let text = fs::read_to_string(&path).with_context(|| {
                diagnostics::error_message(format!("read event library {}", path.display()))
            })?;
            if text.trim().is_empty() {
                MemoryStore::new()
            } else {
                let events: Vec<SavedEvent> = serde_json::from_str(&text).with_context(|| {
                    diagnostics::error_message(format!(
                        "event library {} is not a JSON array of events",
                        path.display()
                    ))
                })?;
                MemoryStore::from_events(events)
            }
        } else {
            tracing::debug!(path = %path.display(), "event library not found, starting empty");
            MemoryStore::new()
        };
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(self.inner.list())?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).with_context(|| {
            diagnostics::error_message(format!("write event library {}", tmp.display()))
        })?;
        fs::rename(&tmp, &self.path).with_context(|| {
            diagnostics::error_message(format!(
                "replace event library {}",
                self.path.display()
            ))
        })?;
        Ok(())
    }
}

impl EventStore for FileStore {
    fn get(&self, name: &str) -> Option<&SavedEvent> {
        self.inner.get(name)
    }

    fn put(&mut self, event: SavedEvent) -> Result<()> {
        tracing::debug!(event = %event.name, "saving event");
        self.inner.upsert(event);
        self.flush()
    }

    fn delete(&mut self, name: &str) -> Result<bool> {
        let removed = self.inner.remove(name);
        if removed {
            self.flush()?;
        }
        Ok(removed)
    }

    fn list(&self) -> &[SavedEvent] {
        self.inner.list()
    }
}
