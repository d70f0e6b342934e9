// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The caching proxy.

use std::{collections::HashMap, time::Duration};

use futures::StreamExt;
use ohno::EnrichableExt;
use storage_backend::{Backend, DynamicBackend, Entry, Error, ErrorKind, Result};
use storage_backend_memory::InMemoryBackend;
use tick::{Clock, PeriodicTimer};

use crate::{
    builder::LocalReplicaBuilder,
    config::ReplicaConfig,
    freshness::FreshnessTable,
    key_locks::KeyLocks,
    registry::BackendRegistry,
    telemetry::{ReplicaActivity, ReplicaOperation, ext::ClockExt, recorder::ReplicaTelemetry},
};

/// Name identifying a replica in logs and metrics.
pub type ReplicaName = &'static str;

/// Where [`LocalReplica::list`](Backend::list) reads names from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum ListSource {
    /// List the remote store, falling back to the local store if the remote fails.
    #[default]
    Remote,
    /// List the local store only. Keys never read or written through this
    /// replica are missing from the result.
    Local,
}

/// A caching replica in front of a remote backend.
///
/// Reads go to the local store while the key is warm, that is, while no more
/// than the cache lifetime has passed since the key was last read from the
/// remote store or written through the replica. Cold reads go to the remote
/// store and copy the result locally. When the remote store fails, the replica
/// serves whatever the local store still holds.
///
/// Writes and deletes stay local: they are never forwarded to the remote store.
/// They are serialized per key with cold reads, so a remote value fetched before
/// a write completes never replaces the written value.
/// A deleted key remains warm and reads as absent until its lifetime lapses,
/// after which the next read fetches it from the remote store again.
///
/// `LocalReplica` implements [`Backend`] itself, so it can stand in wherever a
/// backend is expected.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use local_replica::LocalReplica;
/// use storage_backend::{Backend, Entry};
/// use storage_backend_memory::InMemoryBackend;
/// use tick::ClockControl;
///
/// # futures::executor::block_on(async {
/// let control = ClockControl::new();
/// let remote = InMemoryBackend::new();
/// remote.put(Entry::new("sys/token", "v1")).await?;
///
/// let replica = LocalReplica::builder(remote.clone(), InMemoryBackend::new(), control.to_clock())
///     .cache_lifetime(Duration::from_secs(60))
///     .build();
///
/// // Cold read: fetched from the remote store and kept locally.
/// assert_eq!(replica.get("sys/token").await?.unwrap().value().as_ref(), b"v1");
///
/// // Within the lifetime the local copy is served, even if the remote changed.
/// remote.put(Entry::new("sys/token", "v2")).await?;
/// assert_eq!(replica.get("sys/token").await?.unwrap().value().as_ref(), b"v1");
///
/// // Once the lifetime lapses the remote value wins.
/// control.advance(Duration::from_secs(61));
/// assert_eq!(replica.get("sys/token").await?.unwrap().value().as_ref(), b"v2");
/// # Ok::<(), storage_backend::Error>(())
/// # }).unwrap();
/// ```
#[derive(Debug)]
pub struct LocalReplica<R, L = InMemoryBackend> {
    pub(crate) name: ReplicaName,
    pub(crate) remote: R,
    pub(crate) local: L,
    pub(crate) freshness: FreshnessTable,
    pub(crate) key_locks: KeyLocks,
    pub(crate) clock: Clock,
    pub(crate) list_source: ListSource,
    pub(crate) telemetry: ReplicaTelemetry,
}

impl<R, L> LocalReplica<R, L> {
    /// Starts building a replica over `remote` and `local`, timed by `clock`.
    pub fn builder(remote: R, local: L, clock: Clock) -> LocalReplicaBuilder<R, L> {
        LocalReplicaBuilder::new(remote, local, clock)
    }

    /// Returns the name used in logs and metrics.
    #[must_use]
    pub fn name(&self) -> ReplicaName {
        self.name
    }

    /// Returns the freshness window.
    #[must_use]
    pub fn cache_lifetime(&self) -> Duration {
        self.freshness.lifetime()
    }

    /// Returns where `list` reads from.
    #[must_use]
    pub fn list_source(&self) -> ListSource {
        self.list_source
    }

    /// Returns the remote backend.
    #[must_use]
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Returns the local store.
    #[must_use]
    pub fn local(&self) -> &L {
        &self.local
    }

    /// Returns the per-key sync bookkeeping.
    #[must_use]
    pub fn freshness(&self) -> &FreshnessTable {
        &self.freshness
    }

    /// Returns `true` if a read of `key` would be served from the local store.
    ///
    /// An expired key is dropped from the freshness table as a side effect.
    #[must_use]
    pub fn is_warm(&self, key: &str) -> bool {
        self.freshness.is_warm(key, self.clock.instant())
    }

    /// Drops every expired key from the freshness table and returns how many
    /// were dropped.
    ///
    /// Expired keys are also dropped lazily by reads; sweeping bounds the table
    /// for keys that are never read again.
    pub fn sweep_expired(&self) -> usize {
        let start = self.clock.instant();
        let removed = self.freshness.sweep(start);
        let duration = self.clock.instant().saturating_duration_since(start);

        if removed > 0 {
            self.telemetry
                .record(self.name, ReplicaOperation::Sweep, ReplicaActivity::Expired, duration);
        }
        self.telemetry.record_size(self.name, self.freshness.len());
        removed
    }

    /// Sweeps expired keys every `period`, forever.
    ///
    /// The returned future never completes; spawn it on the runtime that
    /// drives the replica's clock and drop it to stop sweeping.
    pub async fn run_sweeper(&self, period: Duration) {
        let mut timer = PeriodicTimer::new(&self.clock, period);
        while timer.next().await.is_some() {
            let removed = self.sweep_expired();
            tracing::trace!(replica.name = self.name, removed, "freshness sweep");
        }
    }
}

impl LocalReplica<DynamicBackend, InMemoryBackend> {
    /// Builds a replica from a flat configuration map.
    ///
    /// `storage_type` picks the remote backend from `registry`, `cache_lifetime`
    /// optionally overrides the freshness window, and every other key is passed
    /// to the remote backend's factory. The local store is always in-memory.
    ///
    /// # Errors
    ///
    /// Fails with the errors of [`ReplicaConfig::from_map`] and
    /// [`BackendRegistry::construct`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    ///
    /// use local_replica::{BackendRegistry, LocalReplica};
    /// use tick::Clock;
    ///
    /// let config = HashMap::from([
    ///     ("storage_type".to_string(), "inmem".to_string()),
    ///     ("cache_lifetime".to_string(), "PT30S".to_string()),
    /// ]);
    ///
    /// let replica = LocalReplica::from_config(config, &BackendRegistry::default(), Clock::new_frozen())?;
    /// assert_eq!(replica.cache_lifetime().as_secs(), 30);
    /// # Ok::<(), storage_backend::Error>(())
    /// ```
    pub fn from_config(config: HashMap<String, String>, registry: &BackendRegistry, clock: Clock) -> Result<Self> {
        let config = ReplicaConfig::from_map(config)?;
        let cache_lifetime = config.cache_lifetime();
        let (remote, local) = registry.construct_from(config)?;

        Ok(Self::builder(remote, local, clock).cache_lifetime(cache_lifetime).build())
    }
}

fn local_store_error(error: Error) -> Error {
    Error::with_cause(ErrorKind::LocalStore, error)
}

fn fallback_failed(remote_error: Error, local_outcome: String) -> Error {
    Error::with_cause(ErrorKind::FallbackFailed, remote_error).enrich(format!("local fallback: {local_outcome}"))
}

impl<R, L> LocalReplica<R, L>
where
    R: Backend,
    L: Backend,
{
    async fn read_through(&self, key: &str) -> Result<(Option<Entry>, ReplicaActivity)> {
        if self.is_warm(key) {
            return self.warm_read(key).await;
        }

        let slot = self.key_locks.slot(key);
        let seen = {
            let generation = slot.lock().await;
            // A write may have landed since the unlocked check.
            if self.is_warm(key) {
                drop(generation);
                return self.warm_read(key).await;
            }
            *generation
        };

        let fetched = match self.remote.get(key).await {
            Ok(fetched) => fetched,
            Err(remote_error) => return self.cold_read(key, remote_error).await,
        };

        let mut generation = slot.lock().await;
        if *generation != seen {
            // The local copy is newer than whatever the remote returned.
            let local = self.local.get(key).await.map_err(local_store_error)?;
            return Ok((local, ReplicaActivity::Superseded));
        }

        let Some(entry) = fetched else {
            return Ok((None, ReplicaActivity::RemoteMiss));
        };

        self.local.put(entry.clone()).await.map_err(local_store_error)?;
        *generation += 1;
        self.freshness.touch(key, self.clock.instant());
        self.telemetry.record_size(self.name, self.freshness.len());
        Ok((Some(entry), ReplicaActivity::RemoteHit))
    }

    async fn warm_read(&self, key: &str) -> Result<(Option<Entry>, ReplicaActivity)> {
        let entry = self.local.get(key).await.map_err(local_store_error)?;
        Ok((entry, ReplicaActivity::WarmHit))
    }

    async fn cold_read(&self, key: &str, remote_error: Error) -> Result<(Option<Entry>, ReplicaActivity)> {
        match self.local.get(key).await {
            Ok(Some(entry)) => {
                tracing::warn!(
                    replica.name = self.name,
                    key,
                    error = %remote_error,
                    "remote read failed, serving the local copy"
                );
                Ok((Some(entry), ReplicaActivity::ColdFallback))
            }
            Ok(None) => Err(fallback_failed(remote_error, format!("no local entry for {key:?}"))),
            Err(local_error) => Err(fallback_failed(remote_error, format!("local read failed: {local_error}"))),
        }
    }

    async fn list_from_source(&self, prefix: &str) -> Result<(Vec<String>, ReplicaActivity)> {
        if self.list_source == ListSource::Local {
            let names = self.local.list(prefix).await.map_err(local_store_error)?;
            return Ok((names, ReplicaActivity::Listed));
        }

        match self.remote.list(prefix).await {
            Ok(names) => Ok((names, ReplicaActivity::Listed)),
            Err(remote_error) => match self.local.list(prefix).await {
                Ok(names) => {
                    tracing::warn!(
                        replica.name = self.name,
                        prefix,
                        error = %remote_error,
                        "remote list failed, listing the local store"
                    );
                    Ok((names, ReplicaActivity::ColdFallback))
                }
                Err(local_error) => Err(fallback_failed(remote_error, format!("local list failed: {local_error}"))),
            },
        }
    }
}

impl<R, L> Backend for LocalReplica<R, L>
where
    R: Backend,
    L: Backend,
{
    async fn put(&self, entry: Entry) -> Result<()> {
        let key = entry.key().to_owned();
        let slot = self.key_locks.slot(&key);
        let mut generation = slot.lock().await;

        let timed = self.clock.timed_async(self.local.put(entry)).await;
        match timed.result {
            Ok(()) => {
                *generation += 1;
                self.freshness.touch(&key, self.clock.instant());
                self.telemetry
                    .record(self.name, ReplicaOperation::Put, ReplicaActivity::Stored, timed.duration);
                self.telemetry.record_size(self.name, self.freshness.len());
                Ok(())
            }
            Err(e) => {
                self.telemetry
                    .record(self.name, ReplicaOperation::Put, ReplicaActivity::Error, timed.duration);
                Err(local_store_error(e))
            }
        }
    }

    async fn get(&self, key: &str) -> Result<Option<Entry>> {
        let timed = self.clock.timed_async(self.read_through(key)).await;
        let activity = match &timed.result {
            Ok((_, activity)) => *activity,
            Err(e) => ReplicaActivity::from_error(e),
        };
        self.telemetry.record(self.name, ReplicaOperation::Get, activity, timed.duration);
        timed.result.map(|(entry, _)| entry)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        tracing::warn!(
            replica.name = self.name,
            key,
            "deleting from the local store only, the remote store keeps the key"
        );

        let slot = self.key_locks.slot(key);
        let mut generation = slot.lock().await;

        let timed = self.clock.timed_async(self.local.delete(key)).await;
        let activity = if timed.result.is_ok() {
            *generation += 1;
            ReplicaActivity::Deleted
        } else {
            ReplicaActivity::Error
        };
        self.telemetry.record(self.name, ReplicaOperation::Delete, activity, timed.duration);
        timed.result.map_err(local_store_error)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let timed = self.clock.timed_async(self.list_from_source(prefix)).await;
        let activity = match &timed.result {
            Ok((_, activity)) => *activity,
            Err(e) => ReplicaActivity::from_error(e),
        };
        self.telemetry.record(self.name, ReplicaOperation::List, activity, timed.duration);
        timed.result.map(|(names, _)| names)
    }
}
