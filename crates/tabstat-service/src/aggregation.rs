//! Second catalog walk: roll replica stats up into table statistics and
//! cluster-wide size metrics.

use std::collections::HashMap;
use std::sync::Arc;
use tabstat_catalog::{InternalCatalog, TableStatistics, Tablet};
use tabstat_types::{DbId, PartitionId, TableId, TabletId};

use crate::snapshot::StatsSnapshot;

/// An extremal size together with the entity that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extremum<Id> {
    pub id: Option<Id>,
    pub value: i64,
}

impl<Id: Copy> Extremum<Id> {
    fn max_tracker() -> Self {
        Self { id: None, value: 0 }
    }

    fn min_tracker() -> Self {
        Self {
            id: None,
            value: i64::MAX,
        }
    }

    /// Ties go to the later entity.
    fn observe_max(&mut self, id: Id, value: i64) {
        if self.value <= value {
            self.id = Some(id);
            self.value = value;
        }
    }

    /// Ties go to the later entity.
    fn observe_min(&mut self, id: Id, value: i64) {
        if self.value >= value {
            self.id = Some(id);
            self.value = value;
        }
    }

    /// An untouched min tracker reports 0.
    fn finish_min(self) -> Self {
        if self.value == i64::MAX {
            Self { id: self.id, value: 0 }
        } else {
            self
        }
    }
}

impl<Id> Default for Extremum<Id> {
    fn default() -> Self {
        Self { id: None, value: 0 }
    }
}

/// Cluster-wide sizes computed in one aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClusterSizeMetrics {
    pub table_count: i64,
    pub partition_count: i64,
    pub tablet_count: i64,
    pub total_table_size: i64,
    pub max_table: Extremum<TableId>,
    pub min_table: Extremum<TableId>,
    pub max_partition: Extremum<PartitionId>,
    pub min_partition: Extremum<PartitionId>,
    pub max_tablet: Extremum<TabletId>,
    pub min_tablet: Extremum<TabletId>,
    pub avg_table_size: i64,
    pub avg_partition_size: i64,
    pub avg_tablet_size: i64,
}

/// Per-field maximum over the replicas of one tablet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabletMaxima {
    pub data_size: i64,
    pub row_count: i64,
    pub rowset_count: i64,
    pub segment_count: i64,
    pub local_index_size: i64,
    pub local_segment_size: i64,
    /// Sum of data sizes over all replicas.
    pub replica_data_size: i64,
    pub replica_count: i64,
}

pub fn tablet_maxima(tablet: &Tablet) -> TabletMaxima {
    let mut m = TabletMaxima::default();
    for replica in tablet.replicas() {
        m.data_size = m.data_size.max(replica.data_size());
        m.row_count = m.row_count.max(replica.row_count());
        m.rowset_count = m.rowset_count.max(replica.rowset_count());
        m.segment_count = m.segment_count.max(replica.segment_count());
        m.local_index_size = m.local_index_size.max(replica.local_inverted_index_size());
        m.local_segment_size = m.local_segment_size.max(replica.local_segment_size());
        m.replica_data_size = m.replica_data_size.saturating_add(replica.data_size());
        m.replica_count = m.replica_count.saturating_add(1);
    }
    m
}

#[derive(Debug)]
pub struct AggregationResult {
    pub snapshot: StatsSnapshot,
    pub metrics: ClusterSizeMetrics,
}

/// Sizes come from the remote service, so sums saturate instead of
/// overflowing.
fn add_tablet(stats: &mut TableStatistics, m: &TabletMaxima) {
    stats.data_size = stats.data_size.saturating_add(m.data_size);
    stats.total_replica_data_size = stats.total_replica_data_size.saturating_add(m.replica_data_size);
    stats.replica_count = stats.replica_count.saturating_add(m.replica_count);
    stats.row_count = stats.row_count.saturating_add(m.row_count);
    stats.rowset_count = stats.rowset_count.saturating_add(m.rowset_count);
    stats.segment_count = stats.segment_count.saturating_add(m.segment_count);
    stats.local_index_size = stats.local_index_size.saturating_add(m.local_index_size);
    stats.local_segment_size = stats.local_segment_size.saturating_add(m.local_segment_size);
}

struct Trackers {
    max_table: Extremum<TableId>,
    min_table: Extremum<TableId>,
    max_partition: Extremum<PartitionId>,
    min_partition: Extremum<PartitionId>,
    max_tablet: Extremum<TabletId>,
    min_tablet: Extremum<TabletId>,
}

impl Trackers {
    fn new() -> Self {
        Self {
            max_table: Extremum::max_tracker(),
            min_table: Extremum::min_tracker(),
            max_partition: Extremum::max_tracker(),
            min_partition: Extremum::min_tracker(),
            max_tablet: Extremum::max_tracker(),
            min_tablet: Extremum::min_tracker(),
        }
    }
}

/// Recompute statistics for every managed table of `db_ids`.
///
/// Each visible index gets its row count cache refreshed, each table gets
/// its new statistics, and the same values are collected into a fresh
/// snapshot keyed by `(db, table)`. Tables dropped since listing are counted
/// but produce no entry.
pub fn aggregate(catalog: &InternalCatalog, db_ids: &[DbId]) -> AggregationResult {
    let mut snapshot: StatsSnapshot = HashMap::new();
    let mut metrics = ClusterSizeMetrics::default();
    let mut t = Trackers::new();

    for &db_id in db_ids {
        let Some(db) = catalog.get_db(db_id) else {
            continue;
        };
        for table in db.tables() {
            let Some(managed) = table.as_managed() else {
                continue;
            };
            metrics.table_count += 1;
            let Some(guard) = managed.try_read_lock_if_exists() else {
                tracing::trace!(db_id = *db_id, table_id = *table.id(), "table dropped during aggregation");
                continue;
            };

            let mut stats = TableStatistics {
                db_name: db.name().to_string(),
                table_name: table.name().to_string(),
                ..Default::default()
            };

            let partitions = guard.partitions();
            metrics.partition_count += partitions.len() as i64;
            for partition in partitions {
                let mut partition_data_size = 0i64;
                for index in partition.visible_indices() {
                    let mut index_row_count = 0i64;
                    metrics.tablet_count += index.tablet_count() as i64;
                    for tablet in index.tablets() {
                        let m = tablet_maxima(tablet);
                        add_tablet(&mut stats, &m);
                        index_row_count = index_row_count.saturating_add(m.row_count);
                        partition_data_size = partition_data_size.saturating_add(m.data_size);

                        t.max_tablet.observe_max(tablet.id(), m.data_size);
                        t.min_tablet.observe_min(tablet.id(), m.data_size);
                    }
                    index.set_row_count_reported(true);
                    index.set_row_count(index_row_count);
                }
                t.max_partition.observe_max(partition.id(), partition_data_size);
                t.min_partition.observe_min(partition.id(), partition_data_size);
            }

            t.max_table.observe_max(table.id(), stats.data_size);
            t.min_table.observe_min(table.id(), stats.data_size);
            metrics.total_table_size = metrics.total_table_size.saturating_add(stats.data_size);

            tracing::debug!(
                db = db.name(),
                table = table.name(),
                rows = stats.row_count,
                data_size = stats.data_size,
                "finished to set row num for table"
            );

            // Still under the table lock: no stats land once a drop returns.
            let stats = Arc::new(stats);
            table.set_statistics(stats.clone());
            snapshot.insert((db_id, table.id()), stats);
            drop(guard);
        }
    }

    metrics.max_table = t.max_table;
    metrics.min_table = t.min_table.finish_min();
    metrics.max_partition = t.max_partition;
    metrics.min_partition = t.min_partition.finish_min();
    metrics.max_tablet = t.max_tablet;
    metrics.min_tablet = t.min_tablet.finish_min();
    metrics.avg_table_size = metrics.total_table_size / metrics.table_count.max(1);
    metrics.avg_partition_size = metrics.total_table_size / metrics.partition_count.max(1);
    metrics.avg_tablet_size = metrics.total_table_size / metrics.tablet_count.max(1);

    AggregationResult { snapshot, metrics }
}
