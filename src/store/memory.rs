//! In-memory LogStore
//!
//! Vec-backed store with a parking_lot RwLock.

use parking_lot::RwLock;

use crate::id::{IdGenerator, TimestampIdGenerator};
use crate::model::Log;

use super::LogStore;

/// In-memory log store
///
/// ## Concurrency:
/// - `logs`: Protected by RwLock (many concurrent readers, exclusive writer)
/// - Id generation happens outside the lock
pub struct MemoryStore {
    /// Records in insertion order
    logs: RwLock<Vec<Log>>,

    /// Source of ids for appended records
    ids: Box<dyn IdGenerator>,
}

impl MemoryStore {
    /// Create an empty store using timestamp ids
    pub fn new() -> Self {
        Self::with_id_generator(TimestampIdGenerator)
    }

    /// Create an empty store with a custom id source
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            logs: RwLock::new(Vec::new()),
            ids: Box::new(ids),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LogStore for MemoryStore {
    fn list(&self) -> Vec<Log> {
        self.logs.read().clone()
    }

    fn append(&self, mut log: Log) -> Log {
        log.id = self.ids.next_id();
        self.logs.write().push(log.clone());
        log
    }

    fn find_by_id(&self, id: &str) -> Option<Log> {
        self.logs.read().iter().find(|log| log.id == id).cloned()
    }

    fn replace_by_id(&self, id: &str, mut log: Log) -> Option<Log> {
        log.id = id.to_string();

        let mut logs = self.logs.write();
        let mut previous = None;

        // No early exit: a duplicated id has every copy overwritten
        for slot in logs.iter_mut().filter(|slot| slot.id == id) {
            let old = std::mem::replace(slot, log.clone());
            previous.get_or_insert(old);
        }

        previous
    }

    fn len(&self) -> usize {
        self.logs.read().len()
    }
}
