use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use super::{SessionStore, StoreError};

/// Storage file name in the cache directory
const STORAGE_FILE: &str = "storage.json";

/// Token persisted in a small JSON key/value file, the on-disk stand-in for
/// browser local storage. Keys other than ours are preserved.
pub struct FileStore {
    path: PathBuf,
    key: String,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(cache_dir: impl AsRef<Path>, key: impl Into<String>) -> Self {
        Self {
            path: cache_dir.as_ref().join(STORAGE_FILE),
            key: key.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if entries.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)?;
            }
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn save(&self, token: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        // A corrupt file is replaced rather than blocking login
        let mut entries = self.load().unwrap_or_else(|e| {
            warn!(error = %e, path = ?self.path, "Discarding unreadable storage file");
            BTreeMap::new()
        });
        entries.insert(self.key.clone(), token.to_string());
        self.write(&entries)?;
        debug!(path = ?self.path, "Token saved");
        Ok(())
    }

    fn read(&self) -> Option<String> {
        let _guard = self.lock.lock().ok()?;
        match self.load() {
            Ok(mut entries) => entries.remove(&self.key),
            Err(e) => {
                warn!(error = %e, path = ?self.path, "Failed to read storage file");
                None
            }
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut entries = match self.load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, path = ?self.path, "Removing unreadable storage file");
                BTreeMap::new()
            }
        };
        entries.remove(&self.key);
        self.write(&entries)?;
        debug!(path = ?self.path, "Token cleared");
        Ok(())
    }
}
