// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mock backend implementation for testing.
//!
//! This module provides `MockBackend`, a configurable in-memory backend that
//! records all operations and supports failure injection for testing error paths.

use std::{collections::BTreeMap, sync::Arc};

use parking_lot::Mutex;

use crate::{Backend, Entry, Error, list_children};

/// Recorded backend operation with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendOp {
    /// A put operation was performed with the given entry.
    Put(Entry),
    /// A get operation was performed with the given key.
    Get(String),
    /// A delete operation was performed with the given key.
    Delete(String),
    /// A list operation was performed with the given prefix.
    List(String),
}

impl BackendOp {
    /// Returns `true` for a get of exactly `key`.
    #[must_use]
    pub fn is_get_of(&self, key: &str) -> bool {
        matches!(self, Self::Get(k) if k == key)
    }
}

type FailPredicate = Box<dyn Fn(&BackendOp) -> bool + Send + Sync>;

/// A configurable mock backend for testing.
///
/// This backend stores entries in memory and can be configured to fail
/// operations on demand, making it useful for testing error handling paths.
/// All operations are recorded for later verification, including the failed ones.
///
/// # Examples
///
/// ```
/// use storage_backend::{Backend, Entry, testing::{BackendOp, MockBackend}};
///
/// # futures::executor::block_on(async {
/// let backend = MockBackend::new();
///
/// backend.put(Entry::new("key", "value")).await.unwrap();
/// let entry = backend.get("key").await.unwrap();
/// assert_eq!(entry.unwrap().value().as_ref(), b"value");
///
/// assert_eq!(backend.operations(), vec![
///     BackendOp::Put(Entry::new("key", "value")),
///     BackendOp::Get("key".to_string()),
/// ]);
/// # });
/// ```
///
/// # Failure Injection
///
/// ```
/// use storage_backend::{Backend, testing::{BackendOp, MockBackend}};
///
/// # futures::executor::block_on(async {
/// let backend = MockBackend::new();
///
/// // Fail all get operations
/// backend.fail_when(|op| matches!(op, BackendOp::Get(_)));
/// assert!(backend.get("key").await.is_err());
///
/// // Fail only specific keys
/// backend.fail_when(|op| op.is_get_of("forbidden"));
/// assert!(backend.get("forbidden").await.is_err());
/// assert!(backend.get("allowed").await.is_ok());
/// # });
/// ```
pub struct MockBackend {
    data: Arc<Mutex<BTreeMap<String, Entry>>>,
    operations: Arc<Mutex<Vec<BackendOp>>>,
    fail_when: Arc<Mutex<Option<FailPredicate>>>,
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBackend")
            .field("data", &self.data)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl Clone for MockBackend {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Creates a new empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::with_entries(std::iter::empty())
    }

    /// Creates a mock backend with pre-populated entries.
    #[must_use]
    pub fn with_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let data = entries.into_iter().map(|e| (e.key().to_owned(), e)).collect();
        Self {
            data: Arc::new(Mutex::new(data)),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns true if an entry is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.lock().contains_key(key)
    }

    /// Stores an entry directly, without recording an operation.
    ///
    /// Useful for arranging state behind the back of the code under test.
    pub fn seed(&self, entry: Entry) {
        self.data.lock().insert(entry.key().to_owned(), entry);
    }

    /// Sets a predicate that determines when operations should fail.
    ///
    /// The predicate receives the operation and returns `true` if it should fail.
    /// A failing operation is still recorded but leaves the stored data untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use storage_backend::testing::{BackendOp, MockBackend};
    ///
    /// let backend = MockBackend::new();
    ///
    /// // Fail all operations
    /// backend.fail_when(|_| true);
    ///
    /// // Fail only puts
    /// backend.fail_when(|op| matches!(op, BackendOp::Put(_)));
    /// ```
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&BackendOp) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<BackendOp> {
        self.operations.lock().clone()
    }

    /// Returns how many get operations were recorded, failed ones included.
    #[must_use]
    pub fn get_count(&self) -> usize {
        self.operations
            .lock()
            .iter()
            .filter(|op| matches!(op, BackendOp::Get(_)))
            .count()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    /// Records `op` and reports whether it should fail.
    fn record(&self, op: BackendOp) -> Result<(), Error> {
        let fail = self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(&op));
        let failure = fail.then(|| Error::backend(format!("mock: {op:?} failed")));
        self.operations.lock().push(op);
        failure.map_or(Ok(()), Err)
    }
}

impl Backend for MockBackend {
    async fn put(&self, entry: Entry) -> Result<(), Error> {
        self.record(BackendOp::Put(entry.clone()))?;
        self.data.lock().insert(entry.key().to_owned(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Entry>, Error> {
        self.record(BackendOp::Get(key.to_owned()))?;
        Ok(self.data.lock().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.record(BackendOp::Delete(key.to_owned()))?;
        self.data.lock().remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, Error> {
        self.record(BackendOp::List(prefix.to_owned()))?;
        let data = self.data.lock();
        Ok(list_children(prefix, data.keys().map(String::as_str)))
    }
}
