use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::errors::StorageError;

/// Durable string key-value storage, the local-storage equivalent for cart state.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.insert(key, value);
        store
    }

    fn insert(&self, key: &str, value: &str) {
        match self.entries.lock() {
            Ok(mut entries) => entries.insert(key.to_string(), value.to_string()),
            Err(poisoned) => poisoned.into_inner().insert(key.to_string(), value.to_string()),
        };
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = match self.entries.lock() {
            Ok(entries) => entries.get(key).cloned(),
            Err(poisoned) => poisoned.into_inner().get(key).cloned(),
        };
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.insert(key, value);
        Ok(())
    }
}

/// One JSON file per key inside a root directory.
///
/// Writes land in a dot-prefixed sibling file first and are renamed over the target,
/// so readers only ever see a complete value.
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

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key.chars().all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)
            .map_err(|source| StorageError::Write { path: self.root.clone(), source })?;
        let staging = self.root.join(format!(".{key}.json.tmp"));
        fs::write(&staging, value)
            .map_err(|source| StorageError::Write { path: staging.clone(), source })?;
        fs::rename(&staging, &path).map_err(|source| StorageError::Write { path, source })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::errors::StorageError;

    use super::{FileStore, InMemoryStore, KeyValueStore};

    #[test]
    fn in_memory_store_round_trip() {
        let store = InMemoryStore::default();
        assert_eq!(store.get("forno-antico-cart").expect("get"), None);

        store.set("forno-antico-cart", "[]").expect("set");

        assert_eq!(store.get("forno-antico-cart").expect("get").as_deref(), Some("[]"));
    }

    #[test]
    fn in_memory_store_clones_share_entries() {
        let store = InMemoryStore::with_entry("k", "v1");
        let clone = store.clone();
        clone.set("k", "v2").expect("set");

        assert_eq!(store.get("k").expect("get").as_deref(), Some("v2"));
    }

    #[test]
    fn file_store_creates_root_and_persists_values() {
        let dir = TempDir::new().expect("tempdir");
        let store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get("forno-antico-cart").expect("missing key reads as none"), None);
        store.set("forno-antico-cart", r#"[{"quantity":1}]"#).expect("set");

        let reopened = FileStore::new(dir.path().join("nested"));
        assert_eq!(
            reopened.get("forno-antico-cart").expect("get").as_deref(),
            Some(r#"[{"quantity":1}]"#)
        );
        assert!(dir.path().join("nested/forno-antico-cart.json").exists());
    }

    #[test]
    fn file_store_replaces_values_without_leaving_staging_files() {
        let dir = TempDir::new().expect("tempdir");
        let store = FileStore::new(dir.path());

        store.set("forno-antico-cart", "[1]").expect("first set");
        store.set("forno-antico-cart", "[]").expect("second set");

        assert_eq!(store.get("forno-antico-cart").expect("get").as_deref(), Some("[]"));
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["forno-antico-cart.json"]);
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = TempDir::new().expect("tempdir");
        let store = FileStore::new(dir.path());

        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(store.set(key, "x"), Err(StorageError::InvalidKey(_))), "{key}");
        }
    }
}
