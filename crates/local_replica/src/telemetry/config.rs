// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Telemetry configuration for replica operations.

use opentelemetry::{
    InstrumentationScope,
    metrics::{Counter, Gauge, Histogram, MeterProvider},
};

use crate::telemetry::recorder::ReplicaTelemetry;

pub(crate) const REPLICA_EVENT_COUNT_NAME: &str = "replica.event.count";
pub(crate) const REPLICA_OPERATION_DURATION_NAME: &str = "replica.operation.duration";
pub(crate) const REPLICA_FRESHNESS_SIZE_NAME: &str = "replica.freshness.size";

/// Which telemetry outputs a replica emits. Everything is off by default.
#[derive(Clone, Debug, Default)]
pub(crate) struct TelemetryConfig {
    logs_enabled: bool,
    instruments: Option<Instruments>,
}

#[derive(Clone, Debug)]
struct Instruments {
    events: Counter<u64>,
    durations: Histogram<f64>,
    freshness_size: Gauge<u64>,
}

impl Instruments {
    fn from_provider(provider: &dyn MeterProvider) -> Self {
        let meter = provider.meter_with_scope(
            InstrumentationScope::builder(env!("CARGO_PKG_NAME"))
                .with_version(env!("CARGO_PKG_VERSION"))
                .build(),
        );

        Self {
            events: meter
                .u64_counter(REPLICA_EVENT_COUNT_NAME)
                .with_description("Reads, writes, deletes, lists and sweeps by outcome")
                .with_unit("{event}")
                .build(),
            durations: meter
                .f64_histogram(REPLICA_OPERATION_DURATION_NAME)
                .with_description("Time spent in each replica operation")
                .with_unit("s")
                .build(),
            freshness_size: meter
                .u64_gauge(REPLICA_FRESHNESS_SIZE_NAME)
                .with_description("Keys currently tracked as synced")
                .with_unit("{key}")
                .build(),
        }
    }
}

impl TelemetryConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables a `tracing` event for every replica operation.
    #[must_use]
    pub fn with_logs(self) -> Self {
        Self {
            logs_enabled: true,
            ..self
        }
    }

    /// Enables OpenTelemetry metrics from the given provider.
    #[must_use]
    pub fn with_metrics(mut self, provider: &dyn MeterProvider) -> Self {
        self.instruments = Some(Instruments::from_provider(provider));
        self
    }

    #[must_use]
    pub fn build(self) -> ReplicaTelemetry {
        let (event_counter, operation_duration, freshness_size) = match self.instruments {
            Some(i) => (Some(i.events), Some(i.durations), Some(i.freshness_size)),
            None => (None, None, None),
        };

        ReplicaTelemetry {
            logging_enabled: self.logs_enabled,
            event_counter,
            operation_duration,
            freshness_size,
        }
    }
}
