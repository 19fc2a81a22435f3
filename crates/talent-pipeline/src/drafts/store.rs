use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::{validate_key, DraftError};

/// Raw persistence for serialized drafts, keyed by session name.
pub trait DraftStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, DraftError>;
    fn write(&self, key: &str, contents: &str) -> Result<(), DraftError>;
}

/// One JSON file per key inside a directory on the local device.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    directory: PathBuf,
}

impl FileDraftStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, DraftError> {
        validate_key(key)?;
        Ok(self.directory.join(format!("{key}.json")))
    }
}

impl DraftStore for FileDraftStore {
    fn read(&self, key: &str) -> Result<Option<String>, DraftError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(DraftError::Io { path, source }),
        }
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), DraftError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.directory).map_err(|source| DraftError::Io {
            path: self.directory.clone(),
            source,
        })?;
        // Write beside the target and rename into place so a crash mid-write
        // never leaves a truncated draft behind.
        let staging = self.directory.join(format!(".{key}.json.tmp"));
        fs::write(&staging, contents).map_err(|source| DraftError::Io {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &path).map_err(|source| DraftError::Io { path, source })
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryDraftStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl DraftStore for MemoryDraftStore {
    fn read(&self, key: &str) -> Result<Option<String>, DraftError> {
        validate_key(key)?;
        let guard = self
            .entries
            .lock()
            .map_err(|_| DraftError::Unavailable("draft store mutex poisoned".to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), DraftError> {
        validate_key(key)?;
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| DraftError::Unavailable("draft store mutex poisoned".to_string()))?;
        guard.insert(key.to_string(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_and_reports_missing_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileDraftStore::new(dir.path().join("nested"));

        assert_eq!(store.read("resume-builder").expect("read"), None);
        store
            .write("resume-builder", "{\"name\":\"draft\"}")
            .expect("write creates directory");
        assert_eq!(
            store.read("resume-builder").expect("read").as_deref(),
            Some("{\"name\":\"draft\"}")
        );
        assert!(store.directory().join("resume-builder.json").exists());
    }

    #[test]
    fn overwrites_replace_the_file_without_leaving_staging_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileDraftStore::new(dir.path());
        std::fs::write(dir.path().join("resume-builder.json"), "{\"value\": trunc")
            .expect("seed corrupt file");

        store
            .write("resume-builder", "{\"value\":{}}")
            .expect("overwrite");
        assert_eq!(
            store.read("resume-builder").expect("read").as_deref(),
            Some("{\"value\":{}}")
        );

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .expect("list dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["resume-builder.json".to_string()]);
    }

    #[test]
    fn keys_cannot_escape_the_directory() {
        let store = FileDraftStore::new("drafts");
        assert!(matches!(
            store.read("../secrets"),
            Err(DraftError::InvalidKey(_))
        ));
        assert!(matches!(
            MemoryDraftStore::default().write("", "{}"),
            Err(DraftError::InvalidKey(_))
        ));
    }
}
