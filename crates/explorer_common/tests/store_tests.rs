//! Tests for store.rs

use explorer_common::LocalStore;
use explorer_shared::persist::TranscriptSink;
use explorer_shared::PersistenceError;
use std::fs;

#[test]
fn test_persist_creates_dir_and_file() {
    let tmp = tempfile::tempdir().unwrap();
    let store = LocalStore::new(tmp.path().join("local_outputs"));

    let path = store.persist("explorer_1_x.txt", b"transcript").unwrap();
    assert_eq!(path, tmp.path().join("local_outputs").join("explorer_1_x.txt"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "transcript");
}

#[test]
fn test_persist_never_overwrites() {
    let tmp = tempfile::tempdir().unwrap();
    let store = LocalStore::new(tmp.path());

    let first = store.persist("explorer_1_20260101_000000_gauntlet.txt", b"first").unwrap();
    let second = store.persist("explorer_1_20260101_000000_gauntlet.txt", b"second").unwrap();
    let third = store.persist("explorer_1_20260101_000000_gauntlet.txt", b"third").unwrap();

    assert_ne!(first, second);
    assert_eq!(second, tmp.path().join("explorer_1_20260101_000000_gauntlet_2.txt"));
    assert_eq!(third, tmp.path().join("explorer_1_20260101_000000_gauntlet_3.txt"));
    assert_eq!(fs::read_to_string(&first).unwrap(), "first");
    assert_eq!(fs::read_to_string(&second).unwrap(), "second");
}

#[test]
fn test_write_error_names_path() {
    let tmp = tempfile::tempdir().unwrap();
    // a file where the store directory should be
    let blocker = tmp.path().join("out");
    fs::write(&blocker, b"").unwrap();
    let store = LocalStore::new(&blocker);

    let err = store.persist("run.txt", b"x").unwrap_err();
    assert!(matches!(err, PersistenceError::Write { .. }));
    assert!(err.written().is_none());
}

#[test]
fn test_persist_rejects_paths_outside_store() {
    let tmp = tempfile::tempdir().unwrap();
    let store = LocalStore::new(tmp.path().join("out"));

    for hint in ["../escape.txt", "nested/file.txt", ""] {
        assert!(store.persist(hint, b"x").is_err(), "accepted {:?}", hint);
    }
}
