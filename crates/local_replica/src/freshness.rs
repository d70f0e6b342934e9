// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-key bookkeeping of the last successful sync.

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Records when each key was last synced and decides whether it is still warm.
///
/// A key is warm while no more than the cache lifetime has passed since its
/// last sync. Keys found expired are dropped from the table, either lazily when
/// [`is_warm`](Self::is_warm) looks at them or in bulk by [`sweep`](Self::sweep),
/// so the table only ever holds the working set.
///
/// All methods take `&self`; the table is sharded internally and safe to share
/// between tasks.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
///
/// use local_replica::FreshnessTable;
///
/// let table = FreshnessTable::new(Duration::from_secs(60));
/// let now = Instant::now();
///
/// table.touch("key", now);
/// assert!(table.is_warm("key", now + Duration::from_secs(60)));
/// assert!(!table.is_warm("key", now + Duration::from_secs(61)));
/// assert!(table.is_empty());
/// ```
#[derive(Debug)]
pub struct FreshnessTable {
    synced: DashMap<String, Instant>,
    lifetime: Duration,
}

impl FreshnessTable {
    /// Creates an empty table that keeps keys warm for `lifetime`.
    #[must_use]
    pub fn new(lifetime: Duration) -> Self {
        Self {
            synced: DashMap::new(),
            lifetime,
        }
    }

    /// Returns the cache lifetime applied to every key.
    #[must_use]
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Records `now` as the last sync time of `key`, replacing any earlier one.
    pub fn touch(&self, key: &str, now: Instant) {
        self.synced.insert(key.to_owned(), now);
    }

    /// Returns `true` if `key` was synced no more than the lifetime before `now`.
    ///
    /// An expired key is removed. The removal re-checks the timestamp under the
    /// shard lock, so a `touch` racing with it is never lost.
    pub fn is_warm(&self, key: &str, now: Instant) -> bool {
        let Some(synced_at) = self.synced.get(key).map(|r| *r) else {
            return false;
        };

        if !self.is_expired(synced_at, now) {
            return true;
        }

        self.synced.remove_if(key, |_, synced_at| self.is_expired(*synced_at, now));
        false
    }

    /// Removes every expired key and returns how many were removed.
    pub fn sweep(&self, now: Instant) -> usize {
        let mut removed = 0;
        self.synced.retain(|_, synced_at| {
            let keep = !self.is_expired(*synced_at, now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Returns the number of keys currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.synced.len()
    }

    /// Returns `true` if no key is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.synced.is_empty()
    }

    fn is_expired(&self, synced_at: Instant, now: Instant) -> bool {
        now.saturating_duration_since(synced_at) > self.lifetime
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIFETIME: Duration = Duration::from_secs(300);

    #[test]
    fn unknown_key_is_cold() {
        let table = FreshnessTable::new(LIFETIME);
        assert!(!table.is_warm("missing", Instant::now()));
    }

    #[test]
    fn key_is_warm_up_to_and_including_lifetime() {
        let table = FreshnessTable::new(LIFETIME);
        let t0 = Instant::now();
        table.touch("key", t0);

        assert!(table.is_warm("key", t0));
        assert!(table.is_warm("key", t0 + LIFETIME));
        assert!(!table.is_warm("key", t0 + LIFETIME + Duration::from_nanos(1)));
    }

    #[test]
    fn expired_key_is_removed_on_check() {
        let table = FreshnessTable::new(LIFETIME);
        let t0 = Instant::now();
        table.touch("key", t0);

        assert!(!table.is_warm("key", t0 + LIFETIME * 2));
        assert!(table.is_empty());
    }

    #[test]
    fn warm_check_does_not_remove_fresh_keys() {
        let table = FreshnessTable::new(LIFETIME);
        let t0 = Instant::now();
        table.touch("key", t0);

        assert!(table.is_warm("key", t0 + Duration::from_secs(1)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn touch_extends_freshness() {
        let table = FreshnessTable::new(LIFETIME);
        let t0 = Instant::now();
        table.touch("key", t0);
        table.touch("key", t0 + LIFETIME);

        assert!(table.is_warm("key", t0 + LIFETIME * 2));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn clock_going_backwards_keeps_key_warm() {
        let table = FreshnessTable::new(LIFETIME);
        let t0 = Instant::now() + LIFETIME;
        table.touch("key", t0);

        assert!(table.is_warm("key", t0 - Duration::from_secs(1)));
    }

    #[test]
    fn sweep_removes_only_expired_keys() {
        let table = FreshnessTable::new(LIFETIME);
        let t0 = Instant::now();
        table.touch("old-1", t0);
        table.touch("old-2", t0);
        table.touch("fresh", t0 + LIFETIME);

        assert_eq!(table.sweep(t0 + LIFETIME + Duration::from_secs(1)), 2);
        assert_eq!(table.len(), 1);
        assert!(table.is_warm("fresh", t0 + LIFETIME + Duration::from_secs(1)));
        assert_eq!(table.sweep(t0 + LIFETIME + Duration::from_secs(1)), 0);
    }
}
