//! Storage surfaces a content store persists its blobs to
//!
//! A backend is a synchronous key -> string blob store. Each content kind
//! owns exactly one blob under a fixed logical key.

use crate::error::{CacheError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Key -> blob storage surface.
///
/// `write` is best-effort: callers treat an error as "not persisted" and
/// carry on.
pub trait StorageBackend: Send + Sync {
    /// Read the blob under `key`, `None` if absent
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob under `key`
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the blob under `key`; deleting an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process storage, optionally with a per-blob size quota
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse writes of blobs larger than `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            quota_bytes: Some(bytes),
        }
    }

    /// Number of blobs currently held
    pub fn blob_count(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or(0)
    }
}

fn poisoned() -> CacheError {
    CacheError::Storage("storage lock poisoned".to_string())
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let blobs = self.blobs.read().map_err(|_| poisoned())?;
        Ok(blobs.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota_bytes {
            if value.len() > quota {
                return Err(CacheError::QuotaExceeded {
                    needed: value.len(),
                    quota,
                });
            }
        }

        let mut blobs = self.blobs.write().map_err(|_| poisoned())?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut blobs = self.blobs.write().map_err(|_| poisoned())?;
        blobs.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
///
/// The directory is created lazily on first write. Writes land in a temp
/// file that is renamed over the target, so a crashed write never leaves a
/// half-written blob behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the blob file for `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StorageBackend for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Io(e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let target = self.path_for(key);
        let tmp = self
            .dir
            .join(format!(".{}.{}.tmp", key, uuid::Uuid::new_v4().simple()));

        fs::write(&tmp, value)?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(CacheError::Io(e));
        }

        debug!("Wrote {} bytes to {:?}", value.len(), target);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read("k").unwrap(), None);

        storage.write("k", "{}").unwrap();
        assert_eq!(storage.read("k").unwrap(), Some("{}".to_string()));
        assert_eq!(storage.blob_count(), 1);

        storage.remove("k").unwrap();
        storage.remove("k").unwrap();
        assert_eq!(storage.read("k").unwrap(), None);
    }

    #[test]
    fn test_memory_quota() {
        let storage = MemoryStorage::with_quota(4);
        assert!(storage.write("k", "1234").is_ok());

        let err = storage.write("k", "12345").unwrap_err();
        assert!(matches!(err, CacheError::QuotaExceeded { needed: 5, quota: 4 }));
        // Previous blob survives a refused write
        assert_eq!(storage.read("k").unwrap(), Some("1234".to_string()));
    }

    #[test]
    fn test_file_storage_lazy_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("cache");
        let storage = FileStorage::new(&dir);

        assert_eq!(storage.read("oqu_quiz_cache").unwrap(), None);
        assert!(!dir.exists());

        storage.write("oqu_quiz_cache", r#"{"a":1}"#).unwrap();
        assert!(storage.path_for("oqu_quiz_cache").exists());
        assert_eq!(
            storage.read("oqu_quiz_cache").unwrap().as_deref(),
            Some(r#"{"a":1}"#)
        );
    }

    #[test]
    fn test_file_storage_overwrite_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path());

        storage.write("k", "first").unwrap();
        storage.write("k", "second").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("second"));

        let files: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(files.len(), 1);

        storage.remove("k").unwrap();
        storage.remove("k").unwrap();
        assert_eq!(storage.read("k").unwrap(), None);
    }
}
