//! Demo catalog and a metadata service that invents plausible tablet stats.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tabstat_catalog::{IndexState, InternalCatalog, MaterializedIndex, Partition, Replica, Table, Tablet};
use tabstat_proto::{GetTabletStatsReq, GetTabletStatsRsp, MetaServiceStatus, TabletStats};
use tabstat_stubs::IMetaServiceStub;
use tabstat_types::{BackendId, DbId, IndexId, PartitionId, ReplicaId, Result, TableId, TabletId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub databases: i64,
    pub tables_per_db: i64,
    pub external_tables_per_db: i64,
    pub partitions_per_table: i64,
    pub tablets_per_partition: i64,
    pub replicas_per_tablet: i64,
    pub backends: i64,
    /// Bytes every tablet grows by per served request.
    pub growth_per_cycle: i64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            databases: 2,
            tables_per_db: 3,
            external_tables_per_db: 1,
            partitions_per_table: 4,
            tablets_per_partition: 8,
            replicas_per_tablet: 3,
            backends: 3,
            growth_per_cycle: 4096,
        }
    }
}

pub fn seed_catalog(cfg: &DemoConfig) -> Result<Arc<InternalCatalog>> {
    let catalog = InternalCatalog::new();
    let mut next_id = 10_000i64;
    let mut alloc = || {
        next_id += 1;
        next_id
    };

    for d in 0..cfg.databases {
        let db_id = DbId(alloc());
        catalog.create_database(db_id, format!("demo_db_{}", d))?;

        for t in 0..cfg.tables_per_db {
            let table_id = TableId(alloc());
            let partitions = (0..cfg.partitions_per_table)
                .map(|p| {
                    let index_id = IndexId(alloc());
                    let tablets = (0..cfg.tablets_per_partition)
                        .map(|_| {
                            let tablet_id = TabletId(alloc());
                            let replicas = (0..cfg.replicas_per_tablet)
                                .map(|r| {
                                    let backend = BackendId(r % cfg.backends.max(1) + 1);
                                    Arc::new(Replica::new(ReplicaId(alloc()), backend))
                                })
                                .collect();
                            Arc::new(Tablet::new(tablet_id, replicas))
                        })
                        .collect();
                    let index = Arc::new(MaterializedIndex::new(index_id, IndexState::Visible, tablets));
                    Arc::new(Partition::new(PartitionId(alloc()), format!("p{}", p), vec![index]))
                })
                .collect();
            catalog.create_table(db_id, Table::managed(table_id, format!("events_{}", t), partitions))?;
        }

        for e in 0..cfg.external_tables_per_db {
            let table = Table::external(TableId(alloc()), format!("lake_{}", e), "hms://demo-warehouse");
            catalog.create_table(db_id, table)?;
        }
    }

    tracing::info!(
        dbs = catalog.db_count(),
        tablets = catalog.inverted_index().tablet_count(),
        "demo catalog seeded"
    );
    Ok(catalog.into_arc())
}

/// Answers every request with stats derived from the tablet id, growing a
/// little with each call.
pub struct SyntheticMetaService {
    calls: AtomicI64,
    growth: i64,
}

impl SyntheticMetaService {
    pub fn new(growth: i64) -> Self {
        Self {
            calls: AtomicI64::new(0),
            growth,
        }
    }
}

#[async_trait]
impl IMetaServiceStub for SyntheticMetaService {
    async fn get_tablet_stats(&self, req: GetTabletStatsReq) -> Result<GetTabletStatsRsp> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        let tablet_stats = req
            .tablet_idx
            .iter()
            .map(|idx| {
                let base = (*idx.tablet_id % 97 + 1) * 1_000_000;
                let data_size = base + self.growth * call;
                let index_size = data_size / 10;
                let rowsets = *idx.tablet_id % 5 + 1;
                TabletStats {
                    idx: *idx,
                    data_size,
                    num_rows: data_size / 100,
                    num_rowsets: rowsets,
                    num_segments: rowsets * 2,
                    index_size,
                    segment_size: data_size - index_size,
                }
            })
            .collect();
        Ok(GetTabletStatsRsp {
            status: MetaServiceStatus::ok(),
            tablet_stats,
        })
    }
}
