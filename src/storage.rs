//! Key-value persistence for game state.
//!
//! Everything the SDK remembers between sessions (pack opportunities, the
//! card collection, the Meme Dust balance) is stored as opaque string blobs
//! under fixed keys. [`FileStorage`] keeps one file per key on disk;
//! [`MemoryStorage`] keeps them in a map and is meant for tests and
//! throwaway sessions.

use crate::config;
use crate::error::{MemePackError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::debug;

/// A string key-value store with get/set semantics.
///
/// Implementations must be shareable across threads because the async SDK
/// ticks the pack timer from a background task.
pub trait Storage: Send + Sync {
    /// Return the value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

/// Stores each key as a file inside a data directory.
pub struct FileStorage {
    /// Directory holding one file per key.
    pub data_dir: PathBuf,
}

impl FileStorage {
    /// Open a file store rooted at `data_dir`.
    ///
    /// If `data_dir` is `None`, uses the platform-appropriate default data
    /// directory. Creates the directory if it does not exist.
    pub fn open(data_dir: Option<PathBuf>) -> Result<Self> {
        let dir = data_dir.unwrap_or_else(config::default_data_dir);
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "opened file storage");
        Ok(Self { data_dir: dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(MemePackError::InvalidArgument(format!(
                "Storage key '{}' may only contain ASCII letters, digits, '_' and '-'",
                key
            )));
        }
        Ok(self.data_dir.join(format!("{}.json", key)))
    }

    /// Write `contents` to `dest` through a temp file in the same directory.
    ///
    /// The temp file is renamed over the destination only after it has been
    /// fully written and synced, so readers see either the old blob or the
    /// new one.
    fn write_atomic(&self, dest: &Path, contents: &str) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.data_dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(dest).map_err(|e| MemePackError::Io(e.error))?;
        Ok(())
    }

    /// Remove every stored key and recreate the data directory.
    pub fn clear(&self) -> Result<()> {
        if self.data_dir.exists() {
            fs::remove_dir_all(&self.data_dir)?;
            fs::create_dir_all(&self.data_dir)?;
        }
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        self.write_atomic(&path, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// In-memory [`Storage`] that also counts writes.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}
