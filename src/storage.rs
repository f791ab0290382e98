use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::Result;

/// The keys the stores own. Each holds one JSON-serialized value.
pub mod keys {
    pub const USERS: &str = "users";
    pub const CURRENT_USER: &str = "currentUser";
    pub const JOBS: &str = "jobs";
    pub const APPLICATIONS: &str = "applications";
}

/// A key-value string store in the shape of browser localStorage.
///
/// Stores are handed to `IdentityStore`/`JobStore` by reference, so tests
/// can spin up an isolated store per case instead of sharing an ambient
/// singleton. Single logical client; no locking, last write wins.
pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Writes `fixture` under `key` only when nothing is stored there yet.
pub fn ensure_seeded(storage: &dyn Storage, key: &str, fixture: &str) -> Result<()> {
    if storage.read(key)?.is_none() {
        storage.write(key, fixture)?;
    }
    Ok(())
}

/// In-memory store. The default for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// File-backed store: one `<key>.json` per key under a data directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open() -> Result<Self> {
        let dir = Self::default_dir();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn at(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn default_dir() -> PathBuf {
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobboard") {
            proj_dirs.data_dir().to_path_buf()
        } else {
            PathBuf::from(".jobboard")
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_round_trip() {
        let store = MemoryStorage::new();
        assert_eq!(store.read("jobs").unwrap(), None);
        store.write("jobs", "[]").unwrap();
        assert_eq!(store.read("jobs").unwrap().as_deref(), Some("[]"));
        store.remove("jobs").unwrap();
        assert_eq!(store.read("jobs").unwrap(), None);
    }

    #[test]
    fn remove_missing_key_is_not_an_error() {
        let store = MemoryStorage::new();
        store.remove("currentUser").unwrap();
    }

    #[test]
    fn seed_only_writes_when_absent() {
        let store = MemoryStorage::new();
        ensure_seeded(&store, "jobs", "[1]").unwrap();
        assert_eq!(store.read("jobs").unwrap().as_deref(), Some("[1]"));
        ensure_seeded(&store, "jobs", "[2]").unwrap();
        assert_eq!(store.read("jobs").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn file_storage_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStorage::at(tmp.path().join("data")).unwrap();
        assert_eq!(store.read("users").unwrap(), None);
        store.write("users", r#"[{"id":1}]"#).unwrap();
        assert_eq!(store.read("users").unwrap().as_deref(), Some(r#"[{"id":1}]"#));
        store.remove("users").unwrap();
        store.remove("users").unwrap();
        assert_eq!(store.read("users").unwrap(), None);
    }
}
