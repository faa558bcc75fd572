use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::{StoreError, StoreResult};

/// String key-value storage with whole-value reads and writes.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory. Writes go through a
/// temporary file that is renamed into place.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::Backend(format!("invalid storage key: {key:?}")));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                let backup = path.with_extension("json.unreadable");
                match fs::copy(&path, &backup) {
                    Ok(_) => warn!(
                        path = %path.display(),
                        backup = %backup.display(),
                        "stored value is not UTF-8; copied aside"
                    ),
                    Err(copy_err) => warn!(
                        path = %path.display(),
                        error = %copy_err,
                        "stored value is not UTF-8 and could not be copied aside"
                    ),
                }
                Err(StoreError::Backend(format!(
                    "failed to read {}: {err}",
                    path.display()
                )))
            }
            Err(err) => Err(StoreError::Backend(format!(
                "failed to read {}: {err}",
                path.display()
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).map_err(|e| {
            StoreError::Backend(format!(
                "failed to create store directory {}: {e}",
                self.root.display()
            ))
        })?;

        let mut staged = tempfile::NamedTempFile::new_in(&self.root)
            .map_err(|e| StoreError::Backend(format!("failed to stage write: {e}")))?;
        staged
            .write_all(value.as_bytes())
            .map_err(|e| StoreError::Backend(format!("failed to stage write: {e}")))?;
        staged.persist(&path).map_err(|e| {
            StoreError::Backend(format!("failed to write {}: {}", path.display(), e.error))
        })?;
        debug!(path = %path.display(), bytes = value.len(), "stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Backend(format!(
                "failed to remove {}: {err}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn memory_store_round_trip_and_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").expect("get"), None);

        store.set("k", "[1]").expect("set");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("[1]"));

        store.remove("k").expect("remove");
        store.remove("k").expect("remove twice");
        assert_eq!(store.get("k").expect("get"), None);
    }

    #[test]
    fn file_store_creates_directory_and_overwrites() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = FileStore::new(temp_dir.path().join("nested"));

        assert_eq!(store.get("vehicleLog").expect("get"), None);
        store.set("vehicleLog", "[]").expect("set");
        store.set("vehicleLog", "[{}]").expect("overwrite");

        assert_eq!(
            store.get("vehicleLog").expect("get").as_deref(),
            Some("[{}]")
        );
        assert!(temp_dir.path().join("nested/vehicleLog.json").is_file());

        store.remove("vehicleLog").expect("remove");
        assert_eq!(store.get("vehicleLog").expect("get"), None);
    }

    #[test]
    fn file_store_copies_non_utf8_value_aside() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = FileStore::new(temp_dir.path());
        let raw = [0xff, 0xfe, b'[', b']'];
        fs::write(temp_dir.path().join("vehicleLog.json"), raw).expect("write raw");

        assert!(matches!(store.get("vehicleLog"), Err(StoreError::Backend(_))));
        let backup = fs::read(temp_dir.path().join("vehicleLog.json.unreadable"))
            .expect("read backup");
        assert_eq!(backup, raw);
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = FileStore::new(temp_dir.path());

        assert!(matches!(
            store.set("../escape", "x"),
            Err(StoreError::Backend(_))
        ));
    }
}
