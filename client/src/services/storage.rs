//! # Token Storage
//!
//! Durable key/value persistence for the session: three string fields
//! (`access_token`, `refresh_token`, `auth_user`).
//!
//! - [`FileStorage`]: JSON object in `<home>/session.json`, restricted to the
//!   current user (0600 on Unix). Every update rewrites the file through a
//!   temp file and a rename so a crash never leaves half a token pair on disk.
//! - [`MemoryStorage`]: process-local map for tests and ephemeral sessions.
//!
//! Tokens are never logged.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::error::StorageError;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const AUTH_USER_KEY: &str = "auth_user";

/// Every key the session owns, in the order they are cleared.
pub const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, AUTH_USER_KEY];

/// Session file name inside the client home directory.
pub const SESSION_FILE: &str = "session.json";

/// String key/value store backing the session.
pub trait TokenStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Apply several writes (`Some`) and removals (`None`) as one persisted update.
    fn apply(&self, changes: &[(&str, Option<&str>)]) -> Result<(), StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.apply(&[(key, Some(value))])
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.apply(&[(key, None)])
    }

    /// Remove every session key.
    fn clear_session(&self) -> Result<(), StorageError> {
        let changes: Vec<(&str, Option<&str>)> = SESSION_KEYS.iter().map(|key| (*key, None)).collect();
        self.apply(&changes)
    }

    /// Current access token, empty values treated as absent.
    fn access_token(&self) -> Option<String> {
        self.get(ACCESS_TOKEN_KEY).filter(|token| !token.is_empty())
    }
}

fn apply_changes(map: &mut BTreeMap<String, String>, changes: &[(&str, Option<&str>)]) {
    for (key, value) in changes {
        match value {
            Some(value) => {
                map.insert((*key).to_string(), (*value).to_string());
            }
            None => {
                map.remove(*key);
            }
        }
    }
}

/// In-memory storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated storage, handy for restoring a session in tests.
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = values
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: Mutex::new(map),
        }
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn apply(&self, changes: &[(&str, Option<&str>)]) -> Result<(), StorageError> {
        apply_changes(&mut self.values.lock(), changes);
        Ok(())
    }
}

/// File-backed storage; the whole map is cached in memory and rewritten on
/// every update.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open (or lazily create) `<dir>/session.json`.
    pub fn open_in(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open(dir.as_ref().join(SESSION_FILE))
    }

    /// Open a storage file. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let values = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|source| StorageError::Io {
                path: path.display().to_string(),
                source,
            })?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), keys = values.len(), "Opened session storage");
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let contents = serde_json::to_string_pretty(values)?;
        let tmp_path = self.path.with_extension("json.tmp");

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&tmp_path).map_err(io_err)?;
        file.write_all(contents.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);

        fs::rename(&tmp_path, &self.path).map_err(io_err)
    }
}

impl TokenStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn apply(&self, changes: &[(&str, Option<&str>)]) -> Result<(), StorageError> {
        let mut values = self.values.lock();
        let mut next = values.clone();
        apply_changes(&mut next, changes);
        // Only commit to the cache once the file write succeeded
        self.persist(&next)?;
        *values = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        storage.set(ACCESS_TOKEN_KEY, "a").unwrap();
        assert_eq!(storage.access_token().as_deref(), Some("a"));
        storage.remove(ACCESS_TOKEN_KEY).unwrap();
        assert_eq!(storage.get(ACCESS_TOKEN_KEY), None);
    }

    #[test]
    fn test_empty_access_token_is_absent() {
        let storage = MemoryStorage::with_values([(ACCESS_TOKEN_KEY, "")]);
        assert_eq!(storage.access_token(), None);
    }

    #[test]
    fn test_clear_session_removes_only_session_keys() {
        let storage = MemoryStorage::with_values([
            (ACCESS_TOKEN_KEY, "a"),
            (REFRESH_TOKEN_KEY, "r"),
            (AUTH_USER_KEY, "{}"),
            ("theme", "dark"),
        ]);
        storage.clear_session().unwrap();
        for key in SESSION_KEYS {
            assert_eq!(storage.get(key), None);
        }
        assert_eq!(storage.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_storage_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let storage = FileStorage::open_in(dir.path()).unwrap();
            storage
                .apply(&[(ACCESS_TOKEN_KEY, Some("a1")), (REFRESH_TOKEN_KEY, Some("r1"))])
                .unwrap();
        }

        let reopened = FileStorage::open_in(dir.path()).unwrap();
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY).as_deref(), Some("a1"));
        assert_eq!(reopened.get(REFRESH_TOKEN_KEY).as_deref(), Some("r1"));
        assert!(!dir.path().join("session.json.tmp").exists());
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::open(dir.path().join("nested").join("s.json")).unwrap();
        assert_eq!(storage.get(ACCESS_TOKEN_KEY), None);
        storage.set(AUTH_USER_KEY, r#"{"id":1}"#).unwrap();
        assert!(dir.path().join("nested").join("s.json").exists());
    }

    #[test]
    fn test_file_storage_rejects_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SESSION_FILE);
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            FileStorage::open(&path),
            Err(StorageError::Serialization(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_storage_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let storage = FileStorage::open_in(dir.path()).unwrap();
        storage.set(ACCESS_TOKEN_KEY, "secret").unwrap();
        let mode = fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
