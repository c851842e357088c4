use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{Result, StoreError};

/// Single-namespace string key-value storage.
///
/// Each call stands alone; there is no multi-key transaction.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory storage, nothing survives the process
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// [`MemoryStorage`] that fails every call while its switch is on
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    failing: std::rc::Rc<std::cell::Cell<bool>>,
}

#[cfg(test)]
impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared switch; setting it to `true` makes every call fail
    pub fn switch(&self) -> std::rc::Rc<std::cell::Cell<bool>> {
        self.failing.clone()
    }

    fn check(&self) -> Result<()> {
        if self.failing.get() {
            return Err(StoreError::Io {
                path: PathBuf::from("flaky"),
                source: std::io::Error::other("device unavailable"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
impl Storage for FlakyStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.check()?;
        self.inner.remove(key)
    }
}

/// Storage backed by a single JSON object file.
///
/// The whole map is kept in memory and the file is rewritten on every
/// mutation (temp file + rename, so a crash never leaves a half-written file).
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStorage {
    /// Open the storage file, treating a missing file as empty
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => HashMap::new(),
            Ok(content) => serde_json::from_str::<HashMap<String, String>>(&content)
                .map_err(|_| StoreError::Corrupt(path.clone()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "opened script storage");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_get_missing_is_none() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("nope").unwrap(), None);
    }

    #[test]
    fn memory_storage_set_overwrites() {
        let mut storage = MemoryStorage::new();
        storage.set("k", "one").unwrap();
        storage.set("k", "two").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("scripts.json")).unwrap();
        assert_eq!(storage.get("anything").unwrap(), None);
    }

    #[test]
    fn file_storage_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scripts.json");

        let mut storage = FileStorage::open(&path).unwrap();
        storage.set("greeting", "print(\"hi\");").unwrap();
        storage.set("other", "1").unwrap();
        storage.remove("other").unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(
            reopened.get("greeting").unwrap().as_deref(),
            Some("print(\"hi\");")
        );
        assert_eq!(reopened.get("other").unwrap(), None);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn file_storage_rejects_non_object_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scripts.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = FileStorage::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    fn file_storage_remove_missing_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scripts.json");
        let mut storage = FileStorage::open(&path).unwrap();
        storage.remove("ghost").unwrap();
        assert!(!path.exists());
    }
}
