//! In-Memory Record Store
//!
//! Records of string fields keyed by id, with a TTL sidecar table.
//!
//! Every entry point applies the same layering: existence, then expiration,
//! then mutation. A record whose TTL has passed is invisible to all reads
//! even before it is physically removed. Mutating calls purge such a record
//! when they touch it; `expire_records` purges them in bulk.

use hashbrown::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::TtlTable;
use crate::snapshot::codec::{self, SnapshotData, SnapshotRecord};
use crate::snapshot::SnapshotError;

type Fields = HashMap<String, String>;

/// Single-owner in-memory record store
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: HashMap<String, Fields>,
    ttls: TtlTable,
}

impl RecordStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            ttls: TtlTable::new(),
        }
    }

    /// Fields of `id` if the record exists and has not expired at `now`
    fn live(&self, id: &str, now: Instant) -> Option<&Fields> {
        self.records
            .get(id)
            .filter(|_| !self.ttls.is_expired(id, now))
    }

    /// Physically drop `id` if it has expired; returns whether it did
    fn purge_if_expired(&mut self, id: &str, now: Instant) -> bool {
        if !self.ttls.is_expired(id, now) {
            return false;
        }
        self.records.remove(id);
        self.ttls.remove(id);
        debug!(record = id, "Purged expired record");
        true
    }

    /// Set `field` to `value` on `id`, creating the record if needed
    pub fn set(&mut self, id: &str, field: &str, value: &str) {
        self.purge_if_expired(id, Instant::now());
        self.records
            .entry_ref(id)
            .or_default()
            .insert(field.to_string(), value.to_string());
    }

    /// Value of `field` on `id`, or `None` if absent or expired
    pub fn get(&self, id: &str, field: &str) -> Option<String> {
        self.live(id, Instant::now())?.get(field).cloned()
    }

    /// Delete one field; the record goes with its last field
    pub fn delete_field(&mut self, id: &str, field: &str) -> bool {
        if self.purge_if_expired(id, Instant::now()) {
            return false;
        }

        let Some(fields) = self.records.get_mut(id) else {
            return false;
        };
        if fields.remove(field).is_none() {
            return false;
        }

        if fields.is_empty() {
            self.records.remove(id);
            self.ttls.remove(id);
            debug!(record = id, "Removed record with no remaining fields");
        }
        true
    }

    /// Delete a whole record, expired or not.
    ///
    /// Returns false only if the record table holds nothing under `id`.
    pub fn delete_record(&mut self, id: &str) -> bool {
        self.ttls.remove(id);
        self.records.remove(id).is_some()
    }

    /// Sorted field names of `id`; empty if absent or expired
    pub fn fields(&self, id: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .live(id, Instant::now())
            .map(|fields| fields.keys().cloned().collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// Whether `id` exists and has not expired
    pub fn has_record(&self, id: &str) -> bool {
        self.live(id, Instant::now()).is_some()
    }

    /// Sorted ids of every live record
    pub fn record_ids(&self) -> Vec<String> {
        let now = Instant::now();
        let mut ids: Vec<String> = self
            .records
            .keys()
            .filter(|id| !self.ttls.is_expired(id, now))
            .cloned()
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Sorted ids of live records whose `field` equals `value` exactly.
    ///
    /// Linear in the number of records; no secondary index is kept.
    pub fn records_by_field_value(&self, field: &str, value: &str) -> Vec<String> {
        let now = Instant::now();
        let mut ids: Vec<String> = self
            .records
            .iter()
            .filter(|(id, _)| !self.ttls.is_expired(id, now))
            .filter(|(_, fields)| fields.get(field).is_some_and(|v| v == value))
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Expire `id` `ttl_secs` from now, replacing any previous TTL.
    ///
    /// Ignored for records that do not exist or have already expired. Zero or
    /// negative values expire the record immediately.
    pub fn set_ttl(&mut self, id: &str, ttl_secs: i64) {
        let now = Instant::now();
        if self.purge_if_expired(id, now) || !self.records.contains_key(id) {
            debug!(record = id, "TTL ignored for missing record");
            return;
        }
        self.ttls.set(id, ttl_secs, now);
        debug!(record = id, ttl_secs, "TTL set");
    }

    /// Remove every expired record, returning how many were removed
    pub fn expire_records(&mut self) -> usize {
        let now = Instant::now();
        let expired = self.ttls.expired_ids(now);

        for id in &expired {
            self.records.remove(id);
            self.ttls.remove(id);
        }

        if !expired.is_empty() {
            info!(removed = expired.len(), "Expired records swept");
        }
        expired.len()
    }

    /// Time left before `id` expires; `None` without a TTL or once expired
    pub fn ttl(&self, id: &str) -> Option<Duration> {
        let now = Instant::now();
        self.live(id, now)?;
        self.ttls.remaining(id, now)
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.records
            .keys()
            .filter(|id| !self.ttls.is_expired(id, now))
            .count()
    }

    /// Check if the store holds no live records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encode every live record and its remaining TTL as snapshot text
    pub fn backup(&self) -> String {
        let now = Instant::now();
        let mut data = SnapshotData::default();

        for (id, fields) in &self.records {
            if self.ttls.is_expired(id, now) {
                continue;
            }

            let mut fields: Vec<(String, String)> = fields
                .iter()
                .map(|(f, v)| (f.clone(), v.clone()))
                .collect();
            fields.sort_unstable();
            data.records.push(SnapshotRecord {
                id: id.clone(),
                fields,
            });

            if let Some(left) = self.ttls.remaining(id, now) {
                data.ttls.push((id.clone(), codec::remaining_secs(left)));
            }
        }

        data.records.sort_unstable_by(|a, b| a.id.cmp(&b.id));
        data.ttls.sort_unstable();

        debug!(
            records = data.records.len(),
            ttls = data.ttls.len(),
            "Snapshot encoded"
        );
        codec::encode(&data)
    }

    /// Replace the whole store with the contents of `snapshot`.
    ///
    /// TTLs are re-anchored to the current instant. On error the store is
    /// left empty.
    pub fn try_restore(&mut self, snapshot: &str) -> Result<(), SnapshotError> {
        self.records.clear();
        self.ttls.clear();

        let data = codec::decode(snapshot)?;
        let now = Instant::now();

        for record in data.records {
            self.records
                .insert(record.id, record.fields.into_iter().collect());
        }
        for (id, secs) in data.ttls {
            self.ttls.set(&id, secs, now);
        }

        Ok(())
    }

    /// Boolean form of [`try_restore`](Self::try_restore)
    pub fn restore(&mut self, snapshot: &str) -> bool {
        match self.try_restore(snapshot) {
            Ok(()) => {
                info!(records = self.records.len(), "Snapshot restored");
                true
            }
            Err(e) => {
                warn!(error = %e, "Rejected snapshot, store cleared");
                false
            }
        }
    }

    /// Human-readable listing of every live record
    pub fn dump(&self) -> String {
        let ids = self.record_ids();
        if ids.is_empty() {
            return "(empty store)".to_string();
        }

        let mut out = String::new();
        for id in &ids {
            out.push_str(&format!("{}\n", id));
            for field in self.fields(id) {
                if let Some(value) = self.get(id, &field) {
                    out.push_str(&format!("  {} = {}\n", field, value));
                }
            }
            if let Some(left) = self.ttl(id) {
                out.push_str(&format!(
                    "  [ttl: {}s remaining]\n",
                    codec::remaining_secs(left)
                ));
            }
        }
        out.truncate(out.trim_end().len());
        out
    }
}
