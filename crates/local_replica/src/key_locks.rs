// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-key write serialization.
//!
//! Every key with an operation in flight owns a slot: an async mutex around a
//! generation counter. Writers bump the generation while holding the lock. A
//! cold read remembers the generation it started from and only copies the
//! remote value locally if no write landed in between.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub(crate) struct KeyLocks {
    slots: DashMap<String, Arc<Mutex<u64>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot for `key`, creating it if needed.
    ///
    /// The slot is dropped from the map once its last holder releases it.
    pub fn slot<'a>(&'a self, key: &'a str) -> KeySlot<'a> {
        let existing = self.slots.get(key).map(|slot| Arc::clone(&slot));
        let slot = existing.unwrap_or_else(|| Arc::clone(&self.slots.entry(key.to_owned()).or_default()));
        KeySlot { locks: self, key, slot }
    }

    /// Number of keys with an operation in flight.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

#[derive(Debug)]
pub(crate) struct KeySlot<'a> {
    locks: &'a KeyLocks,
    key: &'a str,
    slot: Arc<Mutex<u64>>,
}

impl KeySlot<'_> {
    /// Locks the key's generation counter.
    pub async fn lock(&self) -> MutexGuard<'_, u64> {
        self.slot.lock().await
    }
}

impl Drop for KeySlot<'_> {
    fn drop(&mut self) {
        // The map and this slot are the only holders left.
        self.locks
            .slots
            .remove_if(self.key, |_, slot| Arc::ptr_eq(slot, &self.slot) && Arc::strong_count(slot) == 2);
    }
}
