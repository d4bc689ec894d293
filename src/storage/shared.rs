//! Shared Record Store
//!
//! Cloneable handle that serializes every call through one mutex, for hosts
//! that reach the store from several threads.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use super::RecordStore;
use crate::snapshot::SnapshotError;

/// Thread-safe handle to a [`RecordStore`]
///
/// Each method is one exclusive critical section. Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<RecordStore>>,
}

impl SharedStore {
    /// Create a handle to a new empty store
    pub fn new() -> Self {
        Self::from_store(RecordStore::new())
    }

    /// Wrap an existing store
    pub fn from_store(store: RecordStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run several operations under a single lock acquisition
    pub fn with<R>(&self, f: impl FnOnce(&mut RecordStore) -> R) -> R {
        let mut store = self.inner.lock();
        f(&mut store)
    }

    /// Set `field` to `value` on `id`
    pub fn set(&self, id: &str, field: &str, value: &str) {
        self.inner.lock().set(id, field, value)
    }

    /// Value of `field` on `id`, or `None` if absent or expired
    pub fn get(&self, id: &str, field: &str) -> Option<String> {
        self.inner.lock().get(id, field)
    }

    /// Delete one field; the record goes with its last field
    pub fn delete_field(&self, id: &str, field: &str) -> bool {
        self.inner.lock().delete_field(id, field)
    }

    /// Delete a whole record, expired or not
    pub fn delete_record(&self, id: &str) -> bool {
        self.inner.lock().delete_record(id)
    }

    /// Sorted field names of `id`
    pub fn fields(&self, id: &str) -> Vec<String> {
        self.inner.lock().fields(id)
    }

    /// Whether `id` exists and has not expired
    pub fn has_record(&self, id: &str) -> bool {
        self.inner.lock().has_record(id)
    }

    /// Sorted ids of every live record
    pub fn record_ids(&self) -> Vec<String> {
        self.inner.lock().record_ids()
    }

    /// Sorted ids of live records whose `field` equals `value`
    pub fn records_by_field_value(&self, field: &str, value: &str) -> Vec<String> {
        self.inner.lock().records_by_field_value(field, value)
    }

    /// Expire `id` `ttl_secs` from now
    pub fn set_ttl(&self, id: &str, ttl_secs: i64) {
        self.inner.lock().set_ttl(id, ttl_secs)
    }

    /// Time left before `id` expires
    pub fn ttl(&self, id: &str) -> Option<Duration> {
        self.inner.lock().ttl(id)
    }

    /// Remove every expired record, returning how many were removed
    pub fn expire_records(&self) -> usize {
        self.inner.lock().expire_records()
    }

    /// Encode the live contents as snapshot text
    pub fn backup(&self) -> String {
        self.inner.lock().backup()
    }

    /// Replace the store with `snapshot`; false leaves it empty
    pub fn restore(&self, snapshot: &str) -> bool {
        self.inner.lock().restore(snapshot)
    }

    /// Typed form of [`restore`](Self::restore)
    pub fn try_restore(&self, snapshot: &str) -> Result<(), SnapshotError> {
        self.inner.lock().try_restore(snapshot)
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the store holds no live records
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
