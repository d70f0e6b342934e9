// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for `InMemoryBackend`.

use storage_backend::{Backend, Entry};
use storage_backend_memory::InMemoryBackend;

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

#[test]
fn new_creates_empty_backend() {
    let backend = InMemoryBackend::new();
    assert_eq!(backend.len(), 0);
    assert!(backend.is_empty());
}

#[test]
fn get_returns_none_for_missing_key() {
    block_on(async {
        let backend = InMemoryBackend::new();
        let result = backend.get("missing").await.expect("get failed");
        assert!(result.is_none());
    });
}

#[test]
fn put_and_get_returns_value() {
    block_on(async {
        let backend = InMemoryBackend::new();
        backend.put(Entry::new("key", "value")).await.expect("put failed");

        let entry = backend.get("key").await.expect("get failed").expect("entry should exist");
        assert_eq!(entry, Entry::new("key", "value"));
    });
}

#[test]
fn put_overwrites_existing_value() {
    block_on(async {
        let backend = InMemoryBackend::new();
        backend.put(Entry::new("key", "old")).await.expect("put failed");
        backend.put(Entry::new("key", "new")).await.expect("put failed");

        let entry = backend.get("key").await.expect("get failed").expect("entry should exist");
        assert_eq!(entry.value().as_ref(), b"new");
        assert_eq!(backend.len(), 1);
    });
}

#[test]
fn delete_removes_entry_and_tolerates_missing_keys() {
    block_on(async {
        let backend = InMemoryBackend::new();
        backend.put(Entry::new("key", "value")).await.expect("put failed");

        backend.delete("key").await.expect("delete failed");
        backend.delete("key").await.expect("second delete failed");

        assert!(backend.get("key").await.expect("get failed").is_none());
        assert!(backend.is_empty());
    });
}

#[test]
fn list_returns_direct_children_sorted() {
    block_on(async {
        let backend = InMemoryBackend::new();
        for key in ["sys/policy/admin", "sys/policy/default", "sys/token", "logical/abc"] {
            backend.put(Entry::new(key, "v")).await.expect("put failed");
        }

        assert_eq!(backend.list("").await.expect("list failed"), vec!["logical/", "sys/"]);
        assert_eq!(backend.list("sys/").await.expect("list failed"), vec!["policy/", "token"]);
        assert_eq!(
            backend.list("sys/policy/").await.expect("list failed"),
            vec!["admin", "default"]
        );
        assert!(backend.list("nothing/").await.expect("list failed").is_empty());
    });
}

#[test]
fn clones_share_entries() {
    block_on(async {
        let backend = InMemoryBackend::new();
        let clone = backend.clone();

        backend.put(Entry::new("key", "value")).await.expect("put failed");
        assert!(clone.get("key").await.expect("get failed").is_some());
    });
}
