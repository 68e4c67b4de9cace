//! Storage Backends
//!
//! Raw key/value stores underneath the encoded storage wrapper. Backends see
//! only encoded keys and values.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StorageError;

/// Raw key/value storage interface.
pub trait StorageBackend: Send + Sync {
    /// Read a raw value.
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a raw value.
    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a raw value. Removing a missing key is not an error.
    fn remove_raw(&self, key: &str) -> Result<(), StorageError>;

    /// List all raw keys.
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Remove every entry.
    fn clear(&self) -> Result<(), StorageError> {
        for key in self.keys()? {
            self.remove_raw(&key)?;
        }
        Ok(())
    }
}

fn poisoned() -> StorageError {
    StorageError::ReadFailed {
        message: "storage lock poisoned".to_string(),
    }
}

/// In-memory backend, used for the session scope.
#[derive(Default)]
pub struct InMemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for InMemoryBackend {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .map_err(|_| poisoned())?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().map_err(|_| poisoned())?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.keys().cloned().collect())
    }
}

/// File backend, used for the durable scope.
///
/// Entries are cached in memory and the whole map is rewritten as a JSON
/// object on every mutation (write to a sibling temp file, then rename).
///
/// The rewrite is blocking `std::fs` I/O done while the entry lock is held,
/// so the file always matches the latest in-memory map. Callers on an async
/// runtime, such as a token refresh, block their worker thread for the
/// duration of one small file write.
pub struct FileBackend {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileBackend {
    /// Open the store at `path`, creating it lazily on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => HashMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| StorageError::CorruptedData {
                message: format!("{}: {}", path.display(), e),
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(StorageError::ReadFailed {
                    message: format!("{}: {}", path.display(), e),
                })
            }
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        let write_failed = |e: &dyn std::fmt::Display| StorageError::WriteFailed {
            message: format!("{}: {}", self.path.display(), e),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| write_failed(&e))?;
            }
        }

        let content = serde_json::to_string_pretty(entries).map_err(|e| write_failed(&e))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content).map_err(|e| write_failed(&e))?;
        fs::rename(&tmp, &self.path).map_err(|e| write_failed(&e))
    }
}

impl StorageBackend for FileBackend {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove_raw(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.keys().cloned().collect())
    }
}

/// Mock backend for testing.
#[derive(Default)]
pub struct MockStorageBackend {
    inner: InMemoryBackend,
    should_fail: Mutex<bool>,
    write_history: Mutex<Vec<(String, Option<String>)>>,
}

impl MockStorageBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail.
    pub fn set_should_fail(&self, should_fail: bool) -> &Self {
        if let Ok(mut flag) = self.should_fail.lock() {
            *flag = should_fail;
        }
        self
    }

    /// Raw writes seen so far; `None` marks a removal.
    pub fn get_write_history(&self) -> Vec<(String, Option<String>)> {
        self.write_history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }

    fn check_error(&self) -> Result<(), StorageError> {
        if self.should_fail.lock().map(|flag| *flag).unwrap_or(false) {
            return Err(StorageError::WriteFailed {
                message: "Mock storage failure".to_string(),
            });
        }
        Ok(())
    }

    fn record(&self, key: &str, value: Option<&str>) {
        if let Ok(mut history) = self.write_history.lock() {
            history.push((key.to_string(), value.map(String::from)));
        }
    }
}

impl StorageBackend for MockStorageBackend {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_error()?;
        self.inner.get_raw(key)
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_error()?;
        self.record(key, Some(value));
        self.inner.set_raw(key, value)
    }

    fn remove_raw(&self, key: &str) -> Result<(), StorageError> {
        self.check_error()?;
        self.record(key, None);
        self.inner.remove_raw(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.check_error()?;
        self.inner.keys()
    }
}
