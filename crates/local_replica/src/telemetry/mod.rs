// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Replica telemetry: structured logs through `tracing` and metrics through
//! OpenTelemetry.
//!
//! Every replica operation is recorded as an (operation, activity) pair. Both
//! outputs are opt-in through the replica builder.

use opentelemetry::logs::Severity;
use storage_backend::{Error, ErrorKind};

pub(crate) mod attributes;
pub(crate) mod config;
pub(crate) mod ext;
pub(crate) mod recorder;
#[cfg(test)]
pub(crate) mod testing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReplicaOperation {
    Get,
    Put,
    Delete,
    List,
    Sweep,
}

impl ReplicaOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "replica.get",
            Self::Put => "replica.put",
            Self::Delete => "replica.delete",
            Self::List => "replica.list",
            Self::Sweep => "replica.sweep",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReplicaActivity {
    /// Served from the local store inside the freshness window.
    WarmHit,
    /// Fetched from the remote store and copied locally.
    RemoteHit,
    /// A write landed while the remote read was in flight, so the local copy
    /// was served instead of the remote value.
    Superseded,
    /// The remote store has no such key.
    RemoteMiss,
    /// The remote store failed and the local store answered instead.
    ColdFallback,
    FallbackFailed,
    Stored,
    Deleted,
    Listed,
    Expired,
    Error,
}

impl ReplicaActivity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WarmHit => "replica.warm_hit",
            Self::RemoteHit => "replica.remote_hit",
            Self::Superseded => "replica.superseded",
            Self::RemoteMiss => "replica.remote_miss",
            Self::ColdFallback => "replica.cold_fallback",
            Self::FallbackFailed => "replica.fallback_failed",
            Self::Stored => "replica.stored",
            Self::Deleted => "replica.deleted",
            Self::Listed => "replica.listed",
            Self::Expired => "replica.expired",
            Self::Error => "replica.error",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::WarmHit | Self::Stored | Self::Listed => Severity::Debug,
            Self::RemoteHit | Self::Superseded | Self::RemoteMiss | Self::Deleted | Self::Expired => Severity::Info,
            Self::ColdFallback => Severity::Warn,
            Self::FallbackFailed | Self::Error => Severity::Error,
        }
    }

    pub fn from_error(error: &Error) -> Self {
        match error.kind() {
            ErrorKind::FallbackFailed => Self::FallbackFailed,
            _ => Self::Error,
        }
    }
}
