//! Integration Tests for the Store and Snapshot Codec
//!
//! Drives the public API the way a host process would: set, read, expire,
//! save, restart, load.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tempfile::tempdir;
use tokio_test::{assert_err, assert_ok};
use ttl_kv::cache::{open_backend, Backend, BackendKind, ManualClock};
use ttl_kv::{Config, Db, LoadOutcome, StoreError};

// == Helper Functions ==

const START_MS: u64 = 1_700_000_000_000;

fn manual_db(kind: BackendKind) -> (Arc<ManualClock>, Db) {
    let clock = Arc::new(ManualClock::new(START_MS));
    let db = Db::with_backend(kind, clock.clone());
    (clock, db)
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

// == Expiration Scenarios ==

#[tokio::test]
async fn test_name_and_age_scenario() {
    for kind in [BackendKind::Reference, BackendKind::Indexed] {
        let (clock, db) = manual_db(kind);

        db.set("name", "Satyam", None).await;
        db.set("age", "30", Some(1)).await;
        assert_eq!(db.get("age").await, Some(json!("30")));

        clock.advance(Duration::from_secs(2));

        assert_eq!(db.get("age").await, None);
        assert_eq!(db.get("name").await, Some(json!("Satyam")));
        assert_eq!(db.len().await, 1, "age should have been evicted by the read");
    }
}

#[tokio::test]
async fn test_zero_ttl_means_no_expiration() {
    let (clock, db) = manual_db(BackendKind::Indexed);

    db.set("k", "v", Some(0)).await;
    clock.advance(Duration::from_secs(365 * 24 * 3600));

    assert_eq!(db.sweep_expired().await, 0);
    assert_eq!(db.get("k").await, Some(json!("v")));
}

#[tokio::test]
async fn test_sweep_removes_exactly_expired() {
    let (clock, db) = manual_db(BackendKind::Reference);

    db.set("a", 1, Some(1)).await;
    db.set("b", 2, Some(2)).await;
    db.set("c", 3, Some(10)).await;
    db.set("d", 4, None).await;

    clock.advance(Duration::from_secs(2));

    assert_eq!(db.sweep_expired().await, 2);
    assert_eq!(db.len().await, 2);
    assert_eq!(db.get("c").await, Some(json!(3)));
    assert_eq!(db.get("d").await, Some(json!(4)));
}

#[tokio::test]
async fn test_delete_reports_removal() {
    let (clock, db) = manual_db(BackendKind::Indexed);

    db.set("present", "v", None).await;
    db.set("stale", "v", Some(1)).await;
    clock.advance(Duration::from_secs(5));

    assert!(db.delete("present").await);
    assert_eq!(db.get("present").await, None);
    assert!(!db.delete("never_set").await);
    // Delete still removes an expired entry that has not been observed
    assert!(db.delete("stale").await);
    assert!(!db.delete("stale").await);
}

// == Snapshot Scenarios ==

#[tokio::test]
async fn test_snapshot_file_format() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snap.json");
    let (_, db) = manual_db(BackendKind::Indexed);

    db.set("name", "Satyam", None).await;
    db.set("age", 30, Some(100)).await;
    assert_ok!(db.save_snapshot(&path).await);

    let doc = read_json(&path);
    assert_eq!(doc["data"]["name"], json!("Satyam"));
    assert_eq!(doc["data"]["age"], json!(30));
    assert_eq!(doc["ttl"]["age"].as_f64(), Some(1_700_000_100.0));
    assert!(doc["ttl"].get("name").is_none());
}

#[tokio::test]
async fn test_save_includes_expired_but_load_drops_them() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snap.json");
    let (clock, db) = manual_db(BackendKind::Reference);

    db.set("x", "1", Some(100)).await;
    assert_ok!(db.save_snapshot(&path).await);
    assert!(read_json(&path)["data"].get("x").is_some());

    clock.advance(Duration::from_secs(200));

    let reloaded = Db::with_backend(BackendKind::Indexed, clock.clone());
    let outcome = assert_ok!(reloaded.load_snapshot(&path).await);

    assert_eq!(outcome, LoadOutcome::Loaded { restored: 0, dropped: 1 });
    assert_eq!(reloaded.get("x").await, None);
}

#[tokio::test]
async fn test_restart_keeps_remaining_ttl() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snap.json");
    let (clock, db) = manual_db(BackendKind::Indexed);

    db.set("session", "abc", Some(60)).await;
    db.set("user", json!({"id": 7, "tags": ["a", "b"]}), None).await;
    assert_ok!(db.save_snapshot(&path).await);

    // 30s of downtime, then restart on the other backend
    clock.advance(Duration::from_secs(30));
    let restarted = Db::with_backend(BackendKind::Reference, clock.clone());
    restarted.load_snapshot(&path).await.unwrap();

    assert_eq!(restarted.get("session").await, Some(json!("abc")));
    assert_eq!(
        restarted.get("user").await,
        Some(json!({"id": 7, "tags": ["a", "b"]}))
    );

    clock.advance(Duration::from_secs(30));
    assert_eq!(restarted.get("session").await, None);
}

#[tokio::test]
async fn test_save_overwrites_previous_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snap.json");
    let (_, db) = manual_db(BackendKind::Indexed);

    db.set("first", 1, None).await;
    assert_ok!(db.save_snapshot(&path).await);
    db.delete("first").await;
    db.set("second", 2, None).await;
    assert_ok!(db.save_snapshot(&path).await);

    let doc = read_json(&path);
    assert!(doc["data"].get("first").is_none());
    assert_eq!(doc["data"]["second"], json!(2));

    let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1, "no temp files should remain");
}

#[tokio::test]
async fn test_load_missing_snapshot_is_not_an_error() {
    let dir = tempdir().unwrap();
    let config = Config {
        snapshot_path: dir.path().join("does_not_exist.json"),
        ..Config::default()
    };

    let db = Db::open(&config).await.unwrap();
    assert!(db.is_empty().await);
}

#[tokio::test]
async fn test_load_corrupt_snapshot_is_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corrupt.json");
    fs::write(&path, r#"{"data": {"k": "v"}, "ttl": {"k": "soon"}}"#).unwrap();

    let (_, db) = manual_db(BackendKind::Indexed);
    let err = assert_err!(db.load_snapshot(&path).await);

    assert!(matches!(err, StoreError::Parse { .. }));
    assert!(db.is_empty().await);
}

#[tokio::test]
async fn test_load_hand_written_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hand.json");
    // Past deadline, future deadline, and a key with no deadline
    fs::write(
        &path,
        r#"{
            "data": {"old": "x", "fresh": "y", "plain": 1.5},
            "ttl": {"old": 1600000000, "fresh": 1800000000.25}
        }"#,
    )
    .unwrap();

    let clock = Arc::new(ManualClock::new(START_MS));
    let mut backend = open_backend(BackendKind::Reference, clock);
    let outcome = backend.load_snapshot(&path).unwrap();

    assert_eq!(outcome, LoadOutcome::Loaded { restored: 2, dropped: 1 });
    assert_eq!(backend.get("old"), None);
    assert_eq!(backend.get("fresh"), Some(json!("y")));
    assert_eq!(backend.get("plain"), Some(json!(1.5)));
}
