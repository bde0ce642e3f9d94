//! Published per-table statistics, swapped as a whole after each pass.

use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;
use tabstat_catalog::TableStatistics;
use tabstat_types::{DbId, TableId};

/// Per-table statistics of one aggregation pass.
pub type StatsSnapshot = HashMap<(DbId, TableId), Arc<TableStatistics>>;

/// The published snapshot. Readers never block and never see a map that is
/// still being built; each publish replaces the whole map.
pub struct StatsSnapshotCell {
    current: ArcSwap<StatsSnapshot>,
}

impl StatsSnapshotCell {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// The current map. Stays unchanged for as long as the caller holds it.
    pub fn load(&self) -> Arc<StatsSnapshot> {
        self.current.load_full()
    }

    pub fn get(&self, db_id: DbId, table_id: TableId) -> Option<Arc<TableStatistics>> {
        self.current.load().get(&(db_id, table_id)).cloned()
    }

    pub fn publish(&self, snapshot: StatsSnapshot) {
        self.current.store(Arc::new(snapshot));
    }
}

impl Default for StatsSnapshotCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(size: i64) -> Arc<TableStatistics> {
        Arc::new(TableStatistics {
            data_size: size,
            ..Default::default()
        })
    }

    #[test]
    fn test_starts_empty() {
        let cell = StatsSnapshotCell::new();
        assert!(cell.load().is_empty());
        assert!(cell.get(DbId(1), TableId(1)).is_none());
    }

    #[test]
    fn test_held_snapshot_survives_publish() {
        let cell = StatsSnapshotCell::new();
        cell.publish(HashMap::from([((DbId(1), TableId(1)), stats(10))]));
        let old = cell.load();

        cell.publish(HashMap::from([((DbId(1), TableId(2)), stats(20))]));
        assert_eq!(old.len(), 1);
        assert_eq!(old[&(DbId(1), TableId(1))].data_size, 10);
        assert!(cell.get(DbId(1), TableId(1)).is_none());
        assert_eq!(cell.get(DbId(1), TableId(2)).unwrap().data_size, 20);
    }

    #[test]
    fn test_concurrent_readers_see_whole_maps() {
        let cell = Arc::new(StatsSnapshotCell::new());
        let writer = {
            let cell = cell.clone();
            std::thread::spawn(move || {
                for round in 1..=200i64 {
                    let map = (0..4).map(|t| ((DbId(1), TableId(t)), stats(round))).collect();
                    cell.publish(map);
                }
            })
        };
        for _ in 0..200 {
            let snap = cell.load();
            let mut sizes = snap.values().map(|s| s.data_size);
            if let Some(first) = sizes.next() {
                assert_eq!(snap.len(), 4);
                assert!(sizes.all(|s| s == first));
            }
        }
        writer.join().unwrap();
    }
}
