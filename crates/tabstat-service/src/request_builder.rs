//! First catalog walk: group every tablet into stat requests.

use tabstat_catalog::InternalCatalog;
use tabstat_proto::{GetTabletStatsReq, TabletIndex};
use tabstat_types::DbId;

/// Build `get_tablet_stats` requests covering every tablet of every visible
/// index of every managed table in `db_ids`.
///
/// Tablets appear once each, in catalog order. A request is closed as soon
/// as it holds `batch_size` tablets. Databases dropped since `db_ids` was
/// taken are skipped.
pub fn build_requests(catalog: &InternalCatalog, db_ids: &[DbId], batch_size: usize) -> Vec<GetTabletStatsReq> {
    let batch_size = batch_size.max(1);
    let mut requests = Vec::new();
    let mut current = GetTabletStatsReq::new();

    for &db_id in db_ids {
        let Some(db) = catalog.get_db(db_id) else {
            tracing::trace!(db_id = *db_id, "database vanished before request build");
            continue;
        };
        for table in db.tables() {
            let Some(managed) = table.as_managed() else {
                continue;
            };
            let guard = managed.read_lock();
            for partition in guard.partitions() {
                for index in partition.visible_indices() {
                    for tablet_id in index.tablet_ids_in_order() {
                        current.add_tablet_idx(TabletIndex {
                            db_id,
                            table_id: table.id(),
                            index_id: index.id(),
                            partition_id: partition.id(),
                            tablet_id,
                        });
                        if current.tablet_idx_count() >= batch_size {
                            requests.push(std::mem::take(&mut current));
                        }
                    }
                }
            }
        }
    }

    if !current.is_empty() {
        requests.push(current);
    }
    requests
}
