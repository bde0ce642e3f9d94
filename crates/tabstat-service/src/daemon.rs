//! The periodic stats daemon.

use std::sync::Arc;
use std::time::Instant;
use tabstat_catalog::{InternalCatalog, TableStatistics};
use tabstat_config::ConfigManager;
use tabstat_monitor::MetricsRegistry;
use tabstat_stubs::IMetaServiceStub;
use tabstat_types::{DbId, TableId};
use tabstat_utils::BackgroundRunner;

use crate::aggregation::{aggregate, ClusterSizeMetrics};
use crate::config::TabletStatConfig;
use crate::dispatcher::{DispatchSummary, TabletStatDispatcher};
use crate::metrics::TabletStatMetrics;
use crate::request_builder::build_requests;
use crate::snapshot::{StatsSnapshot, StatsSnapshotCell};

/// Outcome of one collect-merge-aggregate cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub dispatch: DispatchSummary,
    pub metrics: ClusterSizeMetrics,
}

/// Keeps per-table statistics fresh by polling the metadata service.
pub struct TabletStatMgr {
    catalog: Arc<InternalCatalog>,
    config: Arc<ConfigManager<TabletStatConfig>>,
    dispatcher: TabletStatDispatcher,
    snapshot: StatsSnapshotCell,
    metrics: TabletStatMetrics,
}

impl TabletStatMgr {
    /// The worker pool is sized here, from the config at construction.
    pub fn new(
        catalog: Arc<InternalCatalog>,
        stub: Arc<dyn IMetaServiceStub>,
        config: Arc<ConfigManager<TabletStatConfig>>,
        registry: &MetricsRegistry,
    ) -> Self {
        let threads = config.get().max_get_tablet_stat_task_threads_num;
        Self {
            dispatcher: TabletStatDispatcher::new(stub, catalog.clone(), threads),
            catalog,
            config,
            snapshot: StatsSnapshotCell::new(),
            metrics: TabletStatMetrics::new(registry),
        }
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Run one cycle if the catalog has finished loading, otherwise do nothing.
    pub async fn run_after_catalog_ready(&self) -> Option<CycleReport> {
        if !self.catalog.is_ready() {
            tracing::debug!("catalog not ready, skip tablet stat cycle");
            return None;
        }
        Some(self.run_cycle().await)
    }

    /// Fetch stats for every tablet, merge them, then rebuild and publish
    /// the per-table snapshot and cluster metrics.
    ///
    /// Failures are logged and counted in the report; they never abort the cycle.
    pub async fn run_cycle(&self) -> CycleReport {
        let batch_size = self.config.get().get_tablet_stat_batch_size;
        let db_ids = self.catalog.db_ids();
        tracing::info!(dbs = db_ids.len(), batch_size, "begin to get tablet stats");

        let start = Instant::now();
        let requests = build_requests(&self.catalog, &db_ids, batch_size);
        let dispatch = self.dispatcher.dispatch(requests).await;
        tracing::info!(
            batches = dispatch.batches,
            tablets = dispatch.tablets_requested,
            failed = dispatch.failed,
            remote_errors = dispatch.remote_errors,
            merged = dispatch.merge.merged,
            cost_ms = start.elapsed().as_millis() as u64,
            "finished to get tablet stats"
        );

        let start = Instant::now();
        let result = aggregate(&self.catalog, &db_ids);
        self.snapshot.publish(result.snapshot);
        let m = result.metrics;
        tracing::info!(cost_ms = start.elapsed().as_millis() as u64, "finished to update index row num of all databases");
        tracing::info!(
            table_count = m.table_count,
            partition_count = m.partition_count,
            tablet_count = m.tablet_count,
            max_table_size = m.max_table.value,
            max_table_id = ?m.max_table.id,
            min_table_size = m.min_table.value,
            min_table_id = ?m.min_table.id,
            avg_table_size = m.avg_table_size,
            max_partition_size = m.max_partition.value,
            max_partition_id = ?m.max_partition.id,
            min_partition_size = m.min_partition.value,
            min_partition_id = ?m.min_partition.id,
            avg_partition_size = m.avg_partition_size,
            max_tablet_size = m.max_tablet.value,
            max_tablet_id = ?m.max_tablet.id,
            min_tablet_size = m.min_tablet.value,
            min_tablet_id = ?m.min_tablet.id,
            avg_tablet_size = m.avg_tablet_size,
            "finished to update cloud table stats"
        );

        self.metrics.publish(&m);
        self.metrics.record_dispatch(&dispatch);
        self.metrics.record_cycle();

        CycleReport { dispatch, metrics: m }
    }

    /// The snapshot published by the latest cycle.
    pub fn table_stats_map(&self) -> Arc<StatsSnapshot> {
        self.snapshot.load()
    }

    pub fn table_stats(&self, db_id: DbId, table_id: TableId) -> Option<Arc<TableStatistics>> {
        self.snapshot.get(db_id, table_id)
    }

    /// Schedule the cycle on `runner` at the configured interval.
    pub fn start(self: &Arc<Self>, runner: &mut BackgroundRunner) {
        let interval = self.config.get().update_interval();
        let mgr = self.clone();
        runner.spawn_periodic("tablet_stat", interval, move || {
            let mgr = mgr.clone();
            async move {
                mgr.run_after_catalog_ready().await;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{AVG_TABLE_SIZE, CYCLES, MAX_TABLET_SIZE, MIN_TABLE_SIZE};
    use crate::test_util::{catalog_with, managed_table};
    use std::time::Duration;
    use tabstat_proto::{GetTabletStatsRsp, MetaServiceStatus, TabletStats};
    use tabstat_stubs::MockMetaServiceStub;
    use tabstat_types::{RPCCode, Status, TabletId};

    fn config(batch_size: usize) -> Arc<ConfigManager<TabletStatConfig>> {
        Arc::new(ConfigManager::new(TabletStatConfig {
            tablet_stat_update_interval_second: 1,
            max_get_tablet_stat_task_threads_num: 2,
            get_tablet_stat_batch_size: batch_size,
        }))
    }

    fn echo_sizes(mock: &MockMetaServiceStub, size_of: fn(TabletId) -> i64) {
        mock.on_get_tablet_stats(move |req| {
            let tablet_stats = req
                .tablet_idx
                .iter()
                .map(|idx| TabletStats {
                    idx: *idx,
                    data_size: size_of(idx.tablet_id),
                    num_rows: 1,
                    ..Default::default()
                })
                .collect();
            Ok(GetTabletStatsRsp {
                status: MetaServiceStatus::ok(),
                tablet_stats,
            })
        });
    }

    #[tokio::test]
    async fn test_cycle_publishes_table_stats() {
        let catalog = catalog_with(vec![managed_table(1, &[&[&[100, 150], &[200], &[50, 50, 90]]])]);
        let mock = MockMetaServiceStub::new().into_arc();
        let registry = MetricsRegistry::new();
        let mgr = TabletStatMgr::new(catalog, mock.clone(), config(1000), &registry);

        let report = mgr.run_cycle().await;
        assert_eq!(report.dispatch.batches, 1);
        assert_eq!(report.dispatch.tablets_requested, 3);

        let stats = mgr.table_stats(DbId(1), TableId(1)).unwrap();
        assert_eq!(stats.data_size, 440);
        assert_eq!(mgr.table_stats_map().len(), 1);
        assert_eq!(registry.gauge_value(MAX_TABLET_SIZE), Some(200));
        assert_eq!(registry.gauge_value(AVG_TABLE_SIZE), Some(440));
        assert_eq!(registry.counter_value(CYCLES), Some(1));
    }

    #[tokio::test]
    async fn test_merge_then_aggregate() {
        let catalog = catalog_with(vec![managed_table(1, &[&[&[0, 0], &[0]]])]);
        let mock = MockMetaServiceStub::new().into_arc();
        echo_sizes(&mock, |id| if id == TabletId(1000) { 70 } else { 30 });
        let mgr = TabletStatMgr::new(catalog.clone(), mock, config(1), &MetricsRegistry::new());

        let report = mgr.run_cycle().await;
        assert_eq!(report.dispatch.succeeded, 2);
        assert_eq!(report.dispatch.merge.merged, 2);
        let stats = mgr.table_stats(DbId(1), TableId(1)).unwrap();
        assert_eq!(stats.data_size, 100);
        assert_eq!(stats.row_count, 2);
    }

    #[tokio::test]
    async fn test_zero_tables() {
        let catalog = catalog_with(Vec::new());
        let registry = MetricsRegistry::new();
        let mgr = TabletStatMgr::new(catalog, MockMetaServiceStub::new().into_arc(), config(10), &registry);

        let report = mgr.run_cycle().await;
        assert_eq!(report.dispatch, DispatchSummary::default());
        assert_eq!(report.metrics.table_count, 0);
        assert!(mgr.table_stats_map().is_empty());
        let gauges: Vec<_> = registry.collect().into_iter().filter(|s| s.name.ends_with("_bytes")).collect();
        assert_eq!(gauges.len(), 9);
        for sample in &gauges {
            assert_eq!(sample.value, 0.0, "{}", sample.name);
        }
        assert_eq!(registry.gauge_value(MIN_TABLE_SIZE), Some(0));
    }

    #[tokio::test]
    async fn test_failed_batch_keeps_old_values() {
        let catalog = catalog_with(vec![managed_table(1, &[&[&[10], &[20]]])]);
        let mock = MockMetaServiceStub::new().into_arc();
        mock.on_get_tablet_stats(|req| {
            let idx = req.tablet_idx[0];
            if idx.tablet_id == TabletId(1000) {
                return Err(Status::new(RPCCode::CONNECT_FAILED));
            }
            Ok(GetTabletStatsRsp {
                status: MetaServiceStatus::ok(),
                tablet_stats: vec![TabletStats {
                    idx,
                    data_size: 500,
                    ..Default::default()
                }],
            })
        });
        let registry = MetricsRegistry::new();
        let mgr = TabletStatMgr::new(catalog.clone(), mock, config(1), &registry);

        let report = mgr.run_cycle().await;
        assert_eq!(report.dispatch.failed, 1);
        assert_eq!(report.dispatch.succeeded, 1);
        let index = catalog.inverted_index();
        assert_eq!(index.replicas_by_tablet_id(TabletId(1000))[0].data_size(), 10);
        assert_eq!(index.replicas_by_tablet_id(TabletId(1001))[0].data_size(), 500);
        assert_eq!(mgr.table_stats(DbId(1), TableId(1)).unwrap().data_size, 510);
        assert_eq!(registry.counter_value(crate::metrics::RPC_FAILURES), Some(1));
    }

    #[tokio::test]
    async fn test_old_snapshot_is_stable_for_readers() {
        let catalog = catalog_with(vec![managed_table(1, &[&[&[10]]])]);
        let mock = MockMetaServiceStub::new().into_arc();
        let mgr = TabletStatMgr::new(catalog.clone(), mock.clone(), config(10), &MetricsRegistry::new());
        mgr.run_cycle().await;
        let before = mgr.table_stats_map();

        echo_sizes(&mock, |_| 999);
        mgr.run_cycle().await;

        assert_eq!(before[&(DbId(1), TableId(1))].data_size, 10);
        assert_eq!(mgr.table_stats(DbId(1), TableId(1)).unwrap().data_size, 999);
    }

    #[tokio::test]
    async fn test_dropped_table_leaves_the_snapshot() {
        let catalog = catalog_with(vec![managed_table(1, &[&[&[10]]]), managed_table(2, &[&[&[20]]])]);
        let mgr = TabletStatMgr::new(catalog.clone(), MockMetaServiceStub::new().into_arc(), config(10), &MetricsRegistry::new());
        mgr.run_cycle().await;
        assert_eq!(mgr.table_stats_map().len(), 2);

        let dropped = catalog.drop_table(DbId(1), TableId(2)).unwrap();
        mgr.run_cycle().await;
        assert!(mgr.table_stats(DbId(1), TableId(2)).is_none());
        // The table object still carries what was last computed for it.
        assert_eq!(dropped.statistics().unwrap().data_size, 20);
    }

    #[tokio::test]
    async fn test_hot_updated_batch_size_applies_next_cycle() {
        let catalog = catalog_with(vec![managed_table(1, &[&[&[1], &[1], &[1], &[1]]])]);
        let mock = MockMetaServiceStub::new().into_arc();
        let cfg = config(4);
        let mgr = TabletStatMgr::new(catalog, mock.clone(), cfg.clone(), &MetricsRegistry::new());
        assert_eq!(mgr.run_cycle().await.dispatch.batches, 1);

        let mut next = cfg.snapshot();
        next.get_tablet_stat_batch_size = 1;
        cfg.update(next).unwrap();
        assert_eq!(mgr.run_cycle().await.dispatch.batches, 4);
        assert_eq!(mock.call_count(), 5);
    }

    #[tokio::test]
    async fn test_not_ready_catalog_skips_cycle() {
        let catalog = catalog_with(vec![managed_table(1, &[&[&[10]]])]);
        catalog.set_ready(false);
        let mock = MockMetaServiceStub::new().into_arc();
        let mgr = TabletStatMgr::new(catalog.clone(), mock.clone(), config(10), &MetricsRegistry::new());

        assert!(mgr.run_after_catalog_ready().await.is_none());
        assert_eq!(mock.call_count(), 0);
        assert!(mgr.table_stats_map().is_empty());

        catalog.set_ready(true);
        assert!(mgr.run_after_catalog_ready().await.is_some());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_runs_every_interval() {
        let catalog = catalog_with(vec![managed_table(1, &[&[&[10]]])]);
        let registry = MetricsRegistry::new();
        let mgr = TabletStatMgr::new(catalog, MockMetaServiceStub::new().into_arc(), config(10), &registry).into_arc();

        let mut runner = BackgroundRunner::new();
        mgr.start(&mut runner);
        tokio::time::sleep(Duration::from_millis(2500)).await;
        runner.shutdown().await;

        assert_eq!(registry.counter_value(CYCLES), Some(3));
        assert_eq!(mgr.table_stats(DbId(1), TableId(1)).unwrap().data_size, 10);
    }
}
