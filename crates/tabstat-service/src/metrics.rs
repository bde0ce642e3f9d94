//! Cluster size gauges and cycle counters of the stats daemon.

use std::sync::Arc;
use tabstat_monitor::{Counter, Gauge, MetricsRegistry};

use crate::aggregation::ClusterSizeMetrics;
use crate::dispatcher::DispatchSummary;

pub const MAX_TABLE_SIZE: &str = "tablet_stat.max_table_size_bytes";
pub const MAX_PARTITION_SIZE: &str = "tablet_stat.max_partition_size_bytes";
pub const MAX_TABLET_SIZE: &str = "tablet_stat.max_tablet_size_bytes";
pub const MIN_TABLE_SIZE: &str = "tablet_stat.min_table_size_bytes";
pub const MIN_PARTITION_SIZE: &str = "tablet_stat.min_partition_size_bytes";
pub const MIN_TABLET_SIZE: &str = "tablet_stat.min_tablet_size_bytes";
pub const AVG_TABLE_SIZE: &str = "tablet_stat.avg_table_size_bytes";
pub const AVG_PARTITION_SIZE: &str = "tablet_stat.avg_partition_size_bytes";
pub const AVG_TABLET_SIZE: &str = "tablet_stat.avg_tablet_size_bytes";
pub const CYCLES: &str = "tablet_stat.cycles";
pub const RPC_FAILURES: &str = "tablet_stat.rpc_failures";
pub const RPC_REMOTE_ERRORS: &str = "tablet_stat.rpc_remote_errors";

/// Gauges and counters the stats daemon feeds after every cycle.
pub struct TabletStatMetrics {
    max_table_size: Arc<Gauge>,
    max_partition_size: Arc<Gauge>,
    max_tablet_size: Arc<Gauge>,
    min_table_size: Arc<Gauge>,
    min_partition_size: Arc<Gauge>,
    min_tablet_size: Arc<Gauge>,
    avg_table_size: Arc<Gauge>,
    avg_partition_size: Arc<Gauge>,
    avg_tablet_size: Arc<Gauge>,
    cycles: Arc<Counter>,
    rpc_failures: Arc<Counter>,
    rpc_remote_errors: Arc<Counter>,
}

impl TabletStatMetrics {
    pub fn new(registry: &MetricsRegistry) -> Self {
        Self {
            max_table_size: registry.gauge(MAX_TABLE_SIZE),
            max_partition_size: registry.gauge(MAX_PARTITION_SIZE),
            max_tablet_size: registry.gauge(MAX_TABLET_SIZE),
            min_table_size: registry.gauge(MIN_TABLE_SIZE),
            min_partition_size: registry.gauge(MIN_PARTITION_SIZE),
            min_tablet_size: registry.gauge(MIN_TABLET_SIZE),
            avg_table_size: registry.gauge(AVG_TABLE_SIZE),
            avg_partition_size: registry.gauge(AVG_PARTITION_SIZE),
            avg_tablet_size: registry.gauge(AVG_TABLET_SIZE),
            cycles: registry.counter(CYCLES),
            rpc_failures: registry.counter(RPC_FAILURES),
            rpc_remote_errors: registry.counter(RPC_REMOTE_ERRORS),
        }
    }

    pub fn publish(&self, m: &ClusterSizeMetrics) {
        self.max_table_size.set(m.max_table.value);
        self.max_partition_size.set(m.max_partition.value);
        self.max_tablet_size.set(m.max_tablet.value);
        self.min_table_size.set(m.min_table.value);
        self.min_partition_size.set(m.min_partition.value);
        self.min_tablet_size.set(m.min_tablet.value);
        self.avg_table_size.set(m.avg_table_size);
        self.avg_partition_size.set(m.avg_partition_size);
        self.avg_tablet_size.set(m.avg_tablet_size);
    }

    pub fn record_dispatch(&self, summary: &DispatchSummary) {
        self.rpc_failures.add((summary.failed + summary.join_failed) as u64);
        self.rpc_remote_errors.add(summary.remote_errors as u64);
    }

    pub fn record_cycle(&self) {
        self.cycles.increment();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::Extremum;
    use tabstat_types::{PartitionId, TableId, TabletId};

    #[test]
    fn test_publish_sets_all_nine_gauges() {
        let registry = MetricsRegistry::new();
        let metrics = TabletStatMetrics::new(&registry);
        metrics.publish(&ClusterSizeMetrics {
            max_table: Extremum { id: Some(TableId(1)), value: 900 },
            min_table: Extremum { id: Some(TableId(2)), value: 100 },
            max_partition: Extremum { id: Some(PartitionId(1)), value: 600 },
            min_partition: Extremum { id: Some(PartitionId(2)), value: 50 },
            max_tablet: Extremum { id: Some(TabletId(1)), value: 300 },
            min_tablet: Extremum { id: Some(TabletId(2)), value: 5 },
            avg_table_size: 500,
            avg_partition_size: 250,
            avg_tablet_size: 40,
            ..Default::default()
        });

        let expect = [
            (MAX_TABLE_SIZE, 900),
            (MIN_TABLE_SIZE, 100),
            (MAX_PARTITION_SIZE, 600),
            (MIN_PARTITION_SIZE, 50),
            (MAX_TABLET_SIZE, 300),
            (MIN_TABLET_SIZE, 5),
            (AVG_TABLE_SIZE, 500),
            (AVG_PARTITION_SIZE, 250),
            (AVG_TABLET_SIZE, 40),
        ];
        for (name, value) in expect {
            assert_eq!(registry.gauge_value(name), Some(value), "{}", name);
        }
    }

    #[test]
    fn test_counters() {
        let registry = MetricsRegistry::new();
        let metrics = TabletStatMetrics::new(&registry);
        metrics.record_cycle();
        metrics.record_dispatch(&DispatchSummary {
            failed: 2,
            join_failed: 1,
            remote_errors: 4,
            ..Default::default()
        });
        assert_eq!(registry.counter_value(CYCLES), Some(1));
        assert_eq!(registry.counter_value(RPC_FAILURES), Some(3));
        assert_eq!(registry.counter_value(RPC_REMOTE_ERRORS), Some(4));
    }
}
