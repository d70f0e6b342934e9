// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory backend implementation.

use std::{collections::BTreeMap, sync::Arc};

use bytes::Bytes;
use parking_lot::RwLock;
use storage_backend::{Backend, Entry, Error, list_children};

/// An in-memory key-value backend.
///
/// Entries live in a `BTreeMap` behind a read-write lock, so listing walks keys
/// in order and only touches the requested prefix range. Clones share the same
/// map. No operation ever fails.
///
/// # Examples
///
/// ```
/// use storage_backend::{Backend, Entry};
/// use storage_backend_memory::InMemoryBackend;
///
/// # futures::executor::block_on(async {
/// let backend = InMemoryBackend::new();
/// let view = backend.clone();
///
/// backend.put(Entry::new("key", "value")).await?;
/// assert_eq!(view.len(), 1);
/// # Ok::<(), storage_backend::Error>(())
/// # }).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    inner: Arc<RwLock<BTreeMap<String, Bytes>>>,
}

impl InMemoryBackend {
    /// Creates a new, empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    fn list_sync(&self, prefix: &str) -> Vec<String> {
        let map = self.inner.read();
        let in_range = map
            .range::<str, _>((std::ops::Bound::Included(prefix), std::ops::Bound::Unbounded))
            .map(|(key, _)| key.as_str())
            .take_while(|key| key.starts_with(prefix));
        list_children(prefix, in_range)
    }
}

impl Backend for InMemoryBackend {
    async fn put(&self, entry: Entry) -> Result<(), Error> {
        let (key, value) = entry.into_parts();
        self.inner.write().insert(key, value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Entry>, Error> {
        Ok(self.inner.read().get(key).map(|value| Entry::new(key, value.clone())))
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.inner.write().remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, Error> {
        Ok(self.list_sync(prefix))
    }
}
