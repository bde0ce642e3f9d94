use dashmap::DashMap;
use std::sync::Arc;

use crate::metrics::{Counter, Gauge};
use crate::sample::Sample;

/// Name-keyed registry. Asking twice for the same name returns the same metric.
pub struct MetricsRegistry {
    counters: DashMap<String, Arc<Counter>>,
    gauges: DashMap<String, Arc<Gauge>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            counters: DashMap::new(),
            gauges: DashMap::new(),
        }
    }

    pub fn counter(&self, name: &str) -> Arc<Counter> {
        self.counters
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Counter::new(name)))
            .value()
            .clone()
    }

    pub fn gauge(&self, name: &str) -> Arc<Gauge> {
        self.gauges
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Gauge::new(name)))
            .value()
            .clone()
    }

    /// Current value of a registered gauge, `None` if the name was never registered.
    pub fn gauge_value(&self, name: &str) -> Option<i64> {
        self.gauges.get(name).map(|g| g.get())
    }

    pub fn counter_value(&self, name: &str) -> Option<u64> {
        self.counters.get(name).map(|c| c.get())
    }

    /// Snapshot every metric as a sample, sorted by name.
    pub fn collect(&self) -> Vec<Sample> {
        let mut samples: Vec<Sample> = self
            .counters
            .iter()
            .map(|e| Sample::new(e.value().name(), e.value().get() as f64))
            .chain(
                self.gauges
                    .iter()
                    .map(|e| Sample::new(e.value().name(), e.value().get() as f64)),
            )
            .collect();
        samples.sort_by(|a, b| a.name.cmp(&b.name));
        samples
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}
