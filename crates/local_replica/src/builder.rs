// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for [`LocalReplica`].

use std::time::Duration;

use opentelemetry::metrics::MeterProvider;
use tick::Clock;

use crate::{
    config::DEFAULT_CACHE_LIFETIME,
    freshness::FreshnessTable,
    key_locks::KeyLocks,
    replica::{ListSource, LocalReplica, ReplicaName},
    telemetry::config::TelemetryConfig,
};

const DEFAULT_NAME: ReplicaName = "local_replica";

/// Configures and creates a [`LocalReplica`].
///
/// Created by [`LocalReplica::builder()`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use local_replica::{ListSource, LocalReplica};
/// use storage_backend_memory::InMemoryBackend;
/// use tick::Clock;
///
/// let replica = LocalReplica::builder(InMemoryBackend::new(), InMemoryBackend::new(), Clock::new_frozen())
///     .name("secrets")
///     .cache_lifetime(Duration::from_secs(30))
///     .list_source(ListSource::Local)
///     .logs()
///     .build();
///
/// assert_eq!(replica.name(), "secrets");
/// assert_eq!(replica.list_source(), ListSource::Local);
/// ```
#[derive(Debug)]
pub struct LocalReplicaBuilder<R, L> {
    name: ReplicaName,
    remote: R,
    local: L,
    clock: Clock,
    cache_lifetime: Duration,
    list_source: ListSource,
    telemetry: TelemetryConfig,
}

impl<R, L> LocalReplicaBuilder<R, L> {
    pub(crate) fn new(remote: R, local: L, clock: Clock) -> Self {
        Self {
            name: DEFAULT_NAME,
            remote,
            local,
            clock,
            cache_lifetime: DEFAULT_CACHE_LIFETIME,
            list_source: ListSource::default(),
            telemetry: TelemetryConfig::new(),
        }
    }

    /// Sets the name reported in logs and metrics. Defaults to `local_replica`.
    #[must_use]
    pub fn name(mut self, name: ReplicaName) -> Self {
        self.name = name;
        self
    }

    /// Sets how long a synced key is served from the local store. Defaults to five minutes.
    #[must_use]
    pub fn cache_lifetime(mut self, lifetime: Duration) -> Self {
        self.cache_lifetime = lifetime;
        self
    }

    /// Sets where `list` reads names from. Defaults to [`ListSource::Remote`].
    #[must_use]
    pub fn list_source(mut self, source: ListSource) -> Self {
        self.list_source = source;
        self
    }

    /// Emits a `tracing` event for every operation.
    #[must_use]
    pub fn logs(mut self) -> Self {
        self.telemetry = self.telemetry.with_logs();
        self
    }

    /// Records OpenTelemetry metrics through `provider`.
    #[must_use]
    pub fn metrics(mut self, provider: &dyn MeterProvider) -> Self {
        self.telemetry = self.telemetry.with_metrics(provider);
        self
    }

    /// Creates the replica with an empty freshness table.
    #[must_use]
    pub fn build(self) -> LocalReplica<R, L> {
        LocalReplica {
            name: self.name,
            remote: self.remote,
            local: self.local,
            freshness: FreshnessTable::new(self.cache_lifetime),
            key_locks: KeyLocks::new(),
            clock: self.clock,
            list_source: self.list_source,
            telemetry: self.telemetry.build(),
        }
    }
}
