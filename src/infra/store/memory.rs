//! In-memory store with versioned indexes.
//!
//! The reference backend: it defines the conditional-write semantics every
//! other backend must honor. Each index carries a monotonic version; a write
//! applies only when the caller's expected version matches, and every applied
//! write bumps it.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::core::{JobId, JobStore, ScheduleError, Version, VersionedIndex, WriteOutcome};

struct IndexSlot {
    ids: Vec<JobId>,
    version: Version,
}

/// In-memory job store for development and testing.
pub struct InMemoryStore {
    indexes: Mutex<HashMap<String, IndexSlot>>,
    records: Mutex<HashMap<JobId, Vec<u8>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            indexes: Mutex::new(HashMap::new()),
            records: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl JobStore for InMemoryStore {
    fn read_index(&self, name: &str) -> Result<VersionedIndex, ScheduleError> {
        let indexes = self.indexes.lock();
        Ok(indexes.get(name).map_or_else(
            || VersionedIndex {
                ids: Vec::new(),
                version: 0,
            },
            |slot| VersionedIndex {
                ids: slot.ids.clone(),
                version: slot.version,
            },
        ))
    }

    fn write_index(
        &self,
        name: &str,
        ids: &[JobId],
        expected: Version,
    ) -> Result<WriteOutcome, ScheduleError> {
        let mut indexes = self.indexes.lock();
        let slot = indexes.entry(name.to_string()).or_insert_with(|| IndexSlot {
            ids: Vec::new(),
            version: 0,
        });
        if slot.version != expected {
            return Ok(WriteOutcome::Conflict);
        }
        slot.ids = ids.to_vec();
        slot.version += 1;
        Ok(WriteOutcome::Committed)
    }

    fn put_record(&self, id: &JobId, payload: &[u8]) -> Result<(), ScheduleError> {
        self.records.lock().insert(*id, payload.to_vec());
        Ok(())
    }

    fn get_record(&self, id: &JobId) -> Result<Option<Vec<u8>>, ScheduleError> {
        Ok(self.records.lock().get(id).cloned())
    }

    fn delete_record(&self, id: &JobId) -> Result<bool, ScheduleError> {
        Ok(self.records.lock().remove(id).is_some())
    }

    fn record_exists(&self, id: &JobId) -> Result<bool, ScheduleError> {
        Ok(self.records.lock().contains_key(id))
    }
}
