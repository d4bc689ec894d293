//! End-to-end behaviour of the record store through its public API.

use recstore::{RecordStore, SharedStore};
use std::thread;
use std::time::Duration;

/// Store with a mix of plain, TTL-carrying and expired records
fn populated() -> RecordStore {
    let mut store = RecordStore::new();
    store.set("user_001", "name", "Alice Johnson");
    store.set("user_001", "department", "Engineering");
    store.set("user_002", "name", "Bob Smith");
    store.set("user_002", "department", "Engineering");
    store.set("user_003", "name", "Carol Wilson");
    store.set("user_003", "department", "Marketing");
    store.set("session_001", "status", "active");
    store.set_ttl("session_001", 600);
    store.set("session_002", "status", "active");
    store.set_ttl("session_002", 0);
    store
}

fn observe(store: &RecordStore) -> Vec<(String, Vec<(String, Option<String>)>)> {
    store
        .record_ids()
        .into_iter()
        .map(|id| {
            assert!(store.has_record(&id));
            let fields = store
                .fields(&id)
                .into_iter()
                .map(|f| {
                    let v = store.get(&id, &f);
                    (f, v)
                })
                .collect();
            (id, fields)
        })
        .collect()
}

#[test]
fn scenario_set_and_read_fields() {
    let mut store = RecordStore::new();
    store.set("u1", "name", "Alice");
    store.set("u1", "age", "25");

    assert_eq!(store.get("u1", "name").as_deref(), Some("Alice"));
    assert_eq!(store.fields("u1"), vec!["age", "name"]);
}

#[test]
fn scenario_zero_ttl_expires_immediately() {
    let mut store = RecordStore::new();
    store.set("t", "d", "x");
    store.set_ttl("t", 0);
    assert!(!store.has_record("t"));
}

#[test]
fn scenario_filter_by_value() {
    let mut store = RecordStore::new();
    store.set("a", "k", "v");
    store.set("b", "k", "v");
    store.set("c", "k", "w");
    assert_eq!(store.records_by_field_value("k", "v"), vec!["a", "b"]);
}

#[test]
fn scenario_invalid_snapshot() {
    let mut store = populated();
    assert!(!store.restore("not a valid snapshot"));
    assert!(store.record_ids().is_empty());
}

#[test]
fn deleting_missing_things_never_mutates() {
    let mut store = populated();
    let before = observe(&store);

    assert!(!store.delete_record("nobody"));
    assert!(!store.delete_field("nobody", "name"));
    assert!(!store.delete_field("user_001", "email"));

    assert_eq!(observe(&store), before);
}

#[test]
fn round_trip_preserves_observable_state() {
    let mut store = populated();
    store.delete_field("user_003", "department");
    store.delete_record("user_002");
    store.set("odd", "multi\nline", "tab\there \\ slash");
    store.set("odd", "empty", "");

    let snapshot = store.backup();
    let mut restored = RecordStore::new();
    assert!(restored.restore(&snapshot));

    assert_eq!(observe(&restored), observe(&store));
    assert!(!restored.has_record("session_002"));
    assert!(restored.ttl("session_001").is_some());
}

#[test]
fn expired_records_are_absent_from_every_read() {
    let mut store = populated();
    store.set("session_003", "status", "active");
    store.set_ttl("session_003", 1);

    thread::sleep(Duration::from_millis(1100));

    for id in ["session_002", "session_003"] {
        assert!(!store.has_record(id));
        assert_eq!(store.get(id, "status"), None);
        assert!(store.fields(id).is_empty());
        assert!(!store.record_ids().iter().any(|r| r == id));
    }
    assert_eq!(
        store.records_by_field_value("status", "active"),
        vec!["session_001"]
    );

    assert_eq!(store.expire_records(), 2);
    assert_eq!(store.len(), 4);
}

#[test]
fn last_field_deletion_collapses_record() {
    let mut store = populated();

    assert!(store.delete_field("session_001", "status"));
    assert!(!store.has_record("session_001"));

    store.set("session_001", "status", "idle");
    assert_eq!(store.ttl("session_001"), None);
}

#[test]
fn filter_matches_exact_bytes_only() {
    let mut store = populated();
    store.set("user_004", "department", "engineering");
    store.set("user_005", "department", "Engineering ");
    store.set("user_006", "team", "Engineering");

    assert_eq!(
        store.records_by_field_value("department", "Engineering"),
        vec!["user_001", "user_002"]
    );
}

#[test]
fn restored_ttls_keep_relative_time() {
    let mut store = RecordStore::new();
    store.set("s", "f", "v");
    store.set_ttl("s", 2);
    let snapshot = store.backup();

    thread::sleep(Duration::from_millis(1100));

    let mut restored = RecordStore::new();
    assert!(restored.restore(&snapshot));
    let left = restored.ttl("s").unwrap();
    assert!(left > Duration::from_secs(1));
    assert!(left <= Duration::from_secs(2));
}

#[test]
fn shared_store_serializes_writers() {
    let store = SharedStore::from_store(populated());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let s = store.clone();
            thread::spawn(move || {
                for j in 0..50 {
                    s.set(&format!("w{}", i), &format!("f{}", j), "x");
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(store.fields("w0").len(), 50);
    assert_eq!(store.len(), 4 + 4);
}
