// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Recording of replica events.

use std::time::Duration;

use opentelemetry::{
    KeyValue,
    logs::Severity,
    metrics::{Counter, Gauge, Histogram},
};

use crate::{
    replica::ReplicaName,
    telemetry::{ReplicaActivity, ReplicaOperation, attributes},
};

/// Sink for replica events. Every output is optional; a recorder with none
/// enabled does nothing.
#[derive(Clone, Debug, Default)]
pub(crate) struct ReplicaTelemetry {
    pub(super) logging_enabled: bool,
    pub(super) event_counter: Option<Counter<u64>>,
    pub(super) operation_duration: Option<Histogram<f64>>,
    pub(super) freshness_size: Option<Gauge<u64>>,
}

impl ReplicaTelemetry {
    /// Records one replica operation outcome.
    #[inline]
    pub(crate) fn record(&self, name: ReplicaName, operation: ReplicaOperation, activity: ReplicaActivity, duration: Duration) {
        if self.event_counter.is_some() || self.operation_duration.is_some() {
            let attrs = [
                KeyValue::new(attributes::REPLICA_NAME, name),
                KeyValue::new(attributes::REPLICA_OPERATION_NAME, operation.as_str()),
                KeyValue::new(attributes::REPLICA_ACTIVITY_NAME, activity.as_str()),
            ];

            if let Some(c) = &self.event_counter {
                c.add(1, &attrs);
            }

            if let Some(h) = &self.operation_duration {
                h.record(duration.as_secs_f64(), &attrs);
            }
        }

        if self.logging_enabled {
            Self::emit(name, operation, activity, duration);
        }
    }

    /// Records the number of keys in the freshness table.
    #[inline]
    pub(crate) fn record_size(&self, name: ReplicaName, size: usize) {
        if let Some(g) = &self.freshness_size {
            g.record(u64::try_from(size).unwrap_or(u64::MAX), &[KeyValue::new(attributes::REPLICA_NAME, name)]);
        }
    }

    fn emit(name: ReplicaName, operation: ReplicaOperation, activity: ReplicaActivity, duration: Duration) {
        let op = operation.as_str();
        let act = activity.as_str();
        let duration_ns = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);

        // Tracing levels must be constants, hence one arm per level.
        // Field names must match constants in attributes.rs.
        macro_rules! emit_event {
            ($level:ident) => {
                tracing::$level!(
                    replica.name = name,
                    replica.operation = op,
                    replica.activity = act,
                    replica.duration_ns = duration_ns,
                    "replica.event"
                )
            };
        }

        match activity.severity() {
            Severity::Error => emit_event!(error),
            Severity::Warn => emit_event!(warn),
            Severity::Info => emit_event!(info),
            _ => emit_event!(debug),
        }
    }
}
