//! File-backed store adapter.
//!
//! A simplified durable backend: job records are individual JSON files and
//! each schedule index is a versioned JSON file. Conditional index writes are
//! serialized within the process; cross-process exclusion is not provided.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::{JobId, JobStore, ScheduleError, Version, VersionedIndex, WriteOutcome};

#[derive(Serialize, Deserialize)]
struct PersistedIndex {
    version: Version,
    ids: Vec<JobId>,
}

/// File-backed job store rooted at a directory.
pub struct FileStore {
    root: PathBuf,
    index_lock: Mutex<()>,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the layout if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, ScheduleError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("records"))
            .map_err(|e| ScheduleError::Backend(e.to_string()))?;
        fs::create_dir_all(root.join("indexes"))
            .map_err(|e| ScheduleError::Backend(e.to_string()))?;
        Ok(Self {
            root,
            index_lock: Mutex::new(()),
        })
    }

    fn record_path(&self, id: &JobId) -> PathBuf {
        self.root.join("records").join(format!("{id}.json"))
    }

    fn index_path(&self, name: &str) -> PathBuf {
        self.root
            .join("indexes")
            .join(format!("{}.json", Self::sanitize(name)))
    }

    fn sanitize(name: &str) -> String {
        name.chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    fn load_index(&self, name: &str) -> Result<PersistedIndex, ScheduleError> {
        let path = self.index_path(name);
        if !path.exists() {
            return Ok(PersistedIndex {
                version: 0,
                ids: Vec::new(),
            });
        }
        let raw = fs::read(&path).map_err(|e| ScheduleError::Backend(e.to_string()))?;
        serde_json::from_slice(&raw)
            .map_err(|e| ScheduleError::Backend(format!("index `{name}` unreadable: {e}")))
    }
}

impl JobStore for FileStore {
    fn read_index(&self, name: &str) -> Result<VersionedIndex, ScheduleError> {
        let _guard = self.index_lock.lock();
        let persisted = self.load_index(name)?;
        Ok(VersionedIndex {
            ids: persisted.ids,
            version: persisted.version,
        })
    }

    fn write_index(
        &self,
        name: &str,
        ids: &[JobId],
        expected: Version,
    ) -> Result<WriteOutcome, ScheduleError> {
        let _guard = self.index_lock.lock();
        let current = self.load_index(name)?;
        if current.version != expected {
            return Ok(WriteOutcome::Conflict);
        }
        let next = PersistedIndex {
            version: expected + 1,
            ids: ids.to_vec(),
        };
        let raw = serde_json::to_vec(&next).map_err(|e| ScheduleError::Backend(e.to_string()))?;
        fs::write(self.index_path(name), raw).map_err(|e| ScheduleError::Backend(e.to_string()))?;
        Ok(WriteOutcome::Committed)
    }

    fn put_record(&self, id: &JobId, payload: &[u8]) -> Result<(), ScheduleError> {
        fs::write(self.record_path(id), payload).map_err(|e| ScheduleError::Backend(e.to_string()))
    }

    fn get_record(&self, id: &JobId) -> Result<Option<Vec<u8>>, ScheduleError> {
        let path = self.record_path(id);
        if !path.exists() {
            return Ok(None);
        }
        fs::read(&path)
            .map(Some)
            .map_err(|e| ScheduleError::Backend(e.to_string()))
    }

    fn delete_record(&self, id: &JobId) -> Result<bool, ScheduleError> {
        let path = self.record_path(id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|e| ScheduleError::Backend(e.to_string()))?;
        Ok(true)
    }

    fn record_exists(&self, id: &JobId) -> Result<bool, ScheduleError> {
        Ok(self.record_path(id).exists())
    }
}
