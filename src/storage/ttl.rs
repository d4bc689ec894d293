//! TTL Table
//!
//! Monotonic expiration instants kept alongside the record table.

use hashbrown::HashMap;
use std::time::{Duration, Instant};

/// Expiration instants keyed by record id
///
/// A record with no entry here never expires. An entry whose instant is at
/// or before "now" marks the record as logically expired.
#[derive(Debug, Clone, Default)]
pub struct TtlTable {
    expirations: HashMap<String, Instant>,
}

impl TtlTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            expirations: HashMap::new(),
        }
    }

    /// Instant lying `ttl_secs` away from `now`.
    ///
    /// Negative values land in the past (clamped to `now` if the clock cannot
    /// represent them). Returns `None` when the deadline is beyond what
    /// `Instant` can hold.
    pub fn deadline(now: Instant, ttl_secs: i64) -> Option<Instant> {
        let offset = Duration::from_secs(ttl_secs.unsigned_abs());
        if ttl_secs >= 0 {
            now.checked_add(offset)
        } else {
            Some(now.checked_sub(offset).unwrap_or(now))
        }
    }

    /// Set (overwrite) the expiration of `id` to `now + ttl_secs`
    pub fn set(&mut self, id: &str, ttl_secs: i64, now: Instant) {
        match Self::deadline(now, ttl_secs) {
            Some(at) => {
                self.expirations.insert(id.to_string(), at);
            }
            // Unrepresentable deadline: the record simply never expires
            None => {
                self.expirations.remove(id);
            }
        }
    }

    /// Remove the entry for `id`, returning its instant if there was one
    pub fn remove(&mut self, id: &str) -> Option<Instant> {
        self.expirations.remove(id)
    }

    /// Absolute expiration instant of `id`
    pub fn expires_at(&self, id: &str) -> Option<Instant> {
        self.expirations.get(id).copied()
    }

    /// Whether `id` carries an expiration at or before `now`
    #[inline]
    pub fn is_expired(&self, id: &str, now: Instant) -> bool {
        self.expirations
            .get(id)
            .map(|at| now >= *at)
            .unwrap_or(false)
    }

    /// Time left before `id` expires; `None` if it has no TTL or already expired
    pub fn remaining(&self, id: &str, now: Instant) -> Option<Duration> {
        self.expirations
            .get(id)
            .and_then(|at| at.checked_duration_since(now))
            .filter(|left| !left.is_zero())
    }

    /// Ids whose expiration is at or before `now`
    pub fn expired_ids(&self, now: Instant) -> Vec<String> {
        self.expirations
            .iter()
            .filter(|(_, at)| now >= **at)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.expirations.clear();
    }

    /// Number of tracked ids (expired or not)
    pub fn len(&self) -> usize {
        self.expirations.len()
    }

    /// Check if no ids are tracked
    pub fn is_empty(&self) -> bool {
        self.expirations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_expire() {
        let mut ttls = TtlTable::new();
        let now = Instant::now();

        ttls.set("a", 10, now);
        assert!(!ttls.is_expired("a", now));
        assert!(ttls.is_expired("a", now + Duration::from_secs(10)));
        assert!(!ttls.is_expired("missing", now));
    }

    #[test]
    fn test_zero_and_negative_ttl_expire_immediately() {
        let mut ttls = TtlTable::new();
        let now = Instant::now();

        ttls.set("zero", 0, now);
        ttls.set("negative", -30, now);

        assert!(ttls.is_expired("zero", now));
        assert!(ttls.is_expired("negative", now));
        assert_eq!(ttls.remaining("zero", now), None);
    }

    #[test]
    fn test_overwrite_is_not_cumulative() {
        let mut ttls = TtlTable::new();
        let now = Instant::now();

        ttls.set("a", 100, now);
        ttls.set("a", 5, now);
        assert_eq!(ttls.expires_at("a"), Some(now + Duration::from_secs(5)));
        assert_eq!(ttls.len(), 1);
    }

    #[test]
    fn test_remaining() {
        let mut ttls = TtlTable::new();
        let now = Instant::now();

        ttls.set("a", 60, now);
        assert_eq!(
            ttls.remaining("a", now + Duration::from_secs(15)),
            Some(Duration::from_secs(45))
        );
        assert_eq!(ttls.remaining("a", now + Duration::from_secs(61)), None);
        assert_eq!(ttls.remaining("none", now), None);
    }

    #[test]
    fn test_unrepresentable_deadline_clears_entry() {
        let mut ttls = TtlTable::new();
        let now = Instant::now();

        ttls.set("a", 5, now);
        ttls.set("a", i64::MAX, now);
        assert_eq!(ttls.expires_at("a"), None);
    }

    #[test]
    fn test_expired_ids() {
        let mut ttls = TtlTable::new();
        let now = Instant::now();

        ttls.set("old", -1, now);
        ttls.set("now", 0, now);
        ttls.set("later", 60, now);

        let mut expired = ttls.expired_ids(now);
        expired.sort();
        assert_eq!(expired, vec!["now".to_string(), "old".to_string()]);
    }
}
