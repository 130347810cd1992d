//! Local draft storage
//!
//! Drafts are opaque JSON text keyed by a short string. The designer writes
//! one after an idle period and reads it back at startup.

use parking_lot::Mutex;
use playkit_core::PersistenceError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Key/value store for unsaved designer drafts
pub trait DraftStore {
    /// Read the draft stored under `key`, `None` when nothing is stored
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the draft stored under `key`
    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Remove the draft stored under `key`; removing a missing key succeeds
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Draft store backed by one `<key>.json` file per draft
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    root: PathBuf,
}

impl FileDraftStore {
    /// Create a store rooted at `root`; the directory is created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_stem: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{}.json", file_stem))
    }
}

fn io_error(path: &Path, e: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        reason: format!("{}: {}", path.display(), e),
    }
}

impl DraftStore for FileDraftStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.root).map_err(|e| io_error(&self.root, e))?;

        // Write beside the target then rename so a crash never leaves half a draft.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|e| io_error(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| io_error(&path, e))?;

        tracing::debug!("Draft '{}' written to {}", key, path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

/// In-memory draft store
///
/// Used by tests and by hosts without a writable data directory. Writes can
/// be made to fail to simulate a full or unavailable store.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: Mutex<bool>,
    write_count: Mutex<usize>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail with `QuotaExceeded`
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock() = fail;
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        *self.write_count.lock()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }
}

impl DraftStore for MemoryDraftStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if *self.fail_writes.lock() {
            return Err(PersistenceError::QuotaExceeded {
                key: key.to_string(),
            });
        }
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        *self.write_count.lock() += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

impl<S: DraftStore + ?Sized> DraftStore for std::rc::Rc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        (**self).remove(key)
    }
}

impl<S: DraftStore + ?Sized> DraftStore for std::sync::Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        (**self).remove(key)
    }
}
