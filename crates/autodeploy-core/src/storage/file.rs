use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{KeyValueStore, StorageError};

/// Storage file name in the data directory
pub const STORAGE_FILE: &str = "storage.json";

/// Key-value store persisted as one JSON object on disk.
///
/// Every commit rewrites the whole object through a temporary file and a
/// rename, so readers see either the old or the new contents. A missing,
/// unreadable or malformed file reads as empty.
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write commits through this instance
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store at `<data_dir>/storage.json`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(STORAGE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read storage file, treating as empty");
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(map) => map,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Malformed storage file, treating as empty");
                BTreeMap::new()
            }
        }
    }

    fn write_all(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let contents = serde_json::to_string_pretty(map)?;

        // Uniquely named and created 0600 on Unix, so the token is never
        // readable by others and concurrent writers never share a temp file
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), keys = map.len(), "Storage committed");
        Ok(())
    }

    fn commit<F>(&self, mutate: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self.write_lock.lock().unwrap_or_else(|p| p.into_inner());
        let mut map = self.read_all();
        mutate(&mut map);
        self.write_all(&map)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all().remove(key))
    }

    fn set_entries(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        self.commit(|map| {
            for (key, value) in entries {
                map.insert((*key).to_string(), (*value).to_string());
            }
        })
    }

    fn remove_entries(&self, keys: &[&str]) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.commit(|map| {
            for key in keys {
                map.remove(*key);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());

        assert_eq!(store.get("authToken").unwrap(), None);
        // Removing from a store that was never written does not create it
        store.remove_entries(&["authToken"]).unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::in_dir(dir.path())
            .set_entries(&[("a", "1"), ("b", "2")])
            .unwrap();

        let reopened = FileStore::in_dir(dir.path());
        assert_eq!(reopened.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(reopened.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_malformed_file_is_treated_as_empty_and_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        fs::write(store.path(), "{not json").unwrap();

        assert_eq!(store.get("a").unwrap(), None);

        store.set_entries(&[("a", "1")]).unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_remove_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        store.set_entries(&[("a", "1"), ("b", "2"), ("c", "3")]).unwrap();

        store.remove_entries(&["a", "b"]).unwrap();

        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap(), None);
        assert_eq!(store.get("c").unwrap().as_deref(), Some("3"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_private() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        store.set_entries(&[("a", "1")]).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_commits_leave_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let first = FileStore::in_dir(dir.path());
        let second = FileStore::in_dir(dir.path());

        first.set_entries(&[("a", "1")]).unwrap();
        second.set_entries(&[("b", "2")]).unwrap();
        first.remove_entries(&["a"]).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![STORAGE_FILE]);
        assert_eq!(second.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_concurrent_instances_never_corrupt_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORAGE_FILE);

        let writers: Vec<_> = (0..8)
            .map(|i| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let store = FileStore::new(path);
                    for n in 0..20 {
                        let value = format!("{}-{}", i, n);
                        store
                            .set_entries(&[("authToken", value.as_str()), ("user", value.as_str())])
                            .unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let contents = fs::read_to_string(&path).unwrap();
        let map: BTreeMap<String, String> = serde_json::from_str(&contents).unwrap();
        assert_eq!(map.get("authToken"), map.get("user"));
    }
}
