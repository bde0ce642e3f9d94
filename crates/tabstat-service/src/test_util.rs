//! Catalog fixtures shared by the unit tests.

use std::sync::Arc;
use tabstat_catalog::{
    IndexState, InternalCatalog, MaterializedIndex, Partition, Replica, Table, Tablet,
};
use tabstat_types::{BackendId, DbId, IndexId, PartitionId, ReplicaId, TableId, TabletId};

/// Build a managed table from replica data sizes laid out as
/// `partitions[p][tablet][replica]`, one visible index per partition.
///
/// Tablet ids are `table_id * 1000 + n` in traversal order, partition ids
/// `table_id * 100 + p`, index ids `table_id * 100 + 50 + p`.
pub(crate) fn managed_table(table_id: i64, partitions: &[&[&[i64]]]) -> Table {
    let mut next_tablet = table_id * 1000;
    let parts = partitions
        .iter()
        .enumerate()
        .map(|(p, tablets)| {
            let tablets = tablets
                .iter()
                .map(|sizes| {
                    let tablet_id = next_tablet;
                    next_tablet += 1;
                    tablet(tablet_id, sizes)
                })
                .collect();
            let idx = MaterializedIndex::new(IndexId(table_id * 100 + 50 + p as i64), IndexState::Visible, tablets);
            Arc::new(Partition::new(
                PartitionId(table_id * 100 + p as i64),
                format!("p{}", p),
                vec![Arc::new(idx)],
            ))
        })
        .collect();
    Table::managed(TableId(table_id), format!("t{}", table_id), parts)
}

pub(crate) fn tablet(tablet_id: i64, sizes: &[i64]) -> Arc<Tablet> {
    let replicas = sizes
        .iter()
        .enumerate()
        .map(|(i, &size)| {
            let r = Replica::new(ReplicaId(tablet_id * 10 + i as i64), BackendId(i as i64 + 1));
            r.set_data_size(size);
            Arc::new(r)
        })
        .collect();
    Arc::new(Tablet::new(TabletId(tablet_id), replicas))
}

/// A ready catalog with database 1 ("db1") and the given tables.
pub(crate) fn catalog_with(tables: Vec<Table>) -> Arc<InternalCatalog> {
    let catalog = InternalCatalog::new();
    catalog.create_database(DbId(1), "db1").unwrap();
    for t in tables {
        catalog.create_table(DbId(1), t).unwrap();
    }
    catalog.set_ready(true);
    catalog.into_arc()
}
