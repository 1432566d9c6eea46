//! Log Store Module
//!
//! Process-wide collection of log records.
//!
//! ## Responsibilities
//! - Keep records in insertion order (visible in listings)
//! - Assign ids on append
//! - Replace records in place, keeping their position and id
//!
//! ## Data Structure Choice
//! Using Vec wrapped in RwLock:
//! - Insertion order for free
//! - Linear scans by id, fine at the scale this serves
//! - Every operation runs inside one lock scope, so concurrent
//!   requests cannot lose updates

mod memory;

pub use memory::MemoryStore;

use crate::model::Log;

/// Storage operations the request handlers rely on
pub trait LogStore: Send + Sync {
    /// All records in insertion order (empty when none)
    fn list(&self) -> Vec<Log>;

    /// Store a record under a freshly generated id, returning what was stored
    fn append(&self, log: Log) -> Log;

    /// First record with the given id
    fn find_by_id(&self, id: &str) -> Option<Log>;

    /// Overwrite every record with the given id, keeping the id
    ///
    /// Returns the record as it was before the write, or `None` if no
    /// record matched (nothing is written in that case).
    fn replace_by_id(&self, id: &str, log: Log) -> Option<Log>;

    /// Number of stored records
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
