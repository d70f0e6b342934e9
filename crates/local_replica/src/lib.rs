// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A read-through caching replica for key-value backends.
//!
//! [`LocalReplica`] sits in front of a durable remote backend and keeps a copy
//! of every entry it reads or writes in a fast local store. Each key stays
//! *warm* for a fixed cache lifetime after its last sync; warm reads never touch
//! the remote store. When the remote store fails, reads and listings fall back
//! to whatever the local store holds, so callers keep working with possibly
//! stale data instead of failing outright.
//!
//! The replica implements [`Backend`](storage_backend::Backend), so it can be
//! used anywhere a backend is expected.
//!
//! # Quick Start
//!
//! ```
//! use std::collections::HashMap;
//!
//! use local_replica::{BackendRegistry, LocalReplica};
//! use storage_backend::{Backend, Entry};
//! use tick::Clock;
//!
//! # futures::executor::block_on(async {
//! let config = HashMap::from([("storage_type".to_string(), "inmem".to_string())]);
//! let replica = LocalReplica::from_config(config, &BackendRegistry::default(), Clock::new_frozen())?;
//!
//! replica.put(Entry::new("sys/token", "secret")).await?;
//! assert!(replica.is_warm("sys/token"));
//! assert_eq!(replica.get("sys/token").await?.unwrap().value().as_ref(), b"secret");
//! # Ok::<(), storage_backend::Error>(())
//! # }).unwrap();
//! ```
//!
//! # Semantics
//!
//! - `put` writes to the local store only and marks the key warm.
//! - `get` serves warm keys locally. A cold key is read from the remote store
//!   and copied locally; if the remote read fails, the local copy is served.
//! - `delete` removes the local copy only.
//! - `list` reads the remote store by default and falls back to the local store.
//!
//! # Configuration
//!
//! [`LocalReplica::from_config`] builds a replica from a flat string map.
//! `storage_type` selects the remote backend from a [`BackendRegistry`],
//! `cache_lifetime` (for example `"PT5M"` or `"90s"`) overrides the default
//! five-minute window, and the remaining keys configure the remote backend.
//!
//! # Telemetry
//!
//! The builder's `logs()` enables a `tracing` event named `replica.event` per
//! operation, and `metrics()` records the `replica.event.count` counter, the
//! `replica.operation.duration` histogram and the `replica.freshness.size`
//! gauge through OpenTelemetry.

mod builder;
pub mod config;
mod freshness;
mod key_locks;
mod registry;
mod replica;
mod telemetry;

#[doc(inline)]
pub use builder::LocalReplicaBuilder;
#[doc(inline)]
pub use config::{DEFAULT_CACHE_LIFETIME, ReplicaConfig};
#[doc(inline)]
pub use freshness::FreshnessTable;
#[doc(inline)]
pub use registry::{BackendFactory, BackendRegistry};
#[doc(inline)]
pub use replica::{ListSource, LocalReplica, ReplicaName};
