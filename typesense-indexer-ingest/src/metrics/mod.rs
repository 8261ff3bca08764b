//! Metrics sinks for ingest counters.
//!
//! A run reports its counters once, at the end, as independent named
//! counters. Sinks only have to accumulate them.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::info;

/// Counter holding the number of acknowledged index requests.
pub const REQUESTS_COUNT: &str = "requests.count";

/// Counter holding the number of records read.
pub const RECORDS: &str = "records";

/// Receives named counters.
pub trait MetricsSink: Send + Sync {
    /// Add `value` to the counter `name`.
    fn counter(&self, name: &str, value: u64);
}

/// Sink that emits every counter as a structured log event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMetricsSink;

impl MetricsSink for TracingMetricsSink {
    fn counter(&self, name: &str, value: u64) {
        info!(metric = name, value = value, "counter");
    }
}

/// Sink that keeps counters in memory.
#[derive(Debug, Default)]
pub struct InMemoryMetricsSink {
    counters: Mutex<HashMap<String, u64>>,
}

impl InMemoryMetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a counter, if it was ever reported.
    pub fn get(&self, name: &str) -> Option<u64> {
        self.counters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .copied()
    }

    /// Snapshot of all counters.
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.counters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl MetricsSink for InMemoryMetricsSink {
    fn counter(&self, name: &str, value: u64) {
        let mut counters = self
            .counters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *counters.entry(name.to_string()).or_insert(0) += value;
    }
}
