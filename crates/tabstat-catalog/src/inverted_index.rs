use dashmap::DashMap;
use std::sync::Arc;
use tabstat_types::{DbId, IndexId, PartitionId, TableId, TabletId};

use crate::tablet::Replica;

/// Where a tablet lives in the catalog hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabletMeta {
    pub db_id: DbId,
    pub table_id: TableId,
    pub partition_id: PartitionId,
    pub index_id: IndexId,
}

/// Global tablet id lookup, independent of the database/table tree.
#[derive(Debug, Default)]
pub struct TabletInvertedIndex {
    tablet_meta: DashMap<TabletId, TabletMeta>,
    replicas: DashMap<TabletId, Vec<Arc<Replica>>>,
}

impl TabletInvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tablet(&self, tablet_id: TabletId, meta: TabletMeta) {
        self.tablet_meta.insert(tablet_id, meta);
    }

    pub fn add_replica(&self, tablet_id: TabletId, replica: Arc<Replica>) {
        self.replicas.entry(tablet_id).or_default().push(replica);
    }

    pub fn delete_tablet(&self, tablet_id: TabletId) {
        self.tablet_meta.remove(&tablet_id);
        self.replicas.remove(&tablet_id);
    }

    pub fn tablet_meta(&self, tablet_id: TabletId) -> Option<TabletMeta> {
        self.tablet_meta.get(&tablet_id).map(|m| *m)
    }

    /// Replicas of a tablet in registration order. Empty if unknown.
    pub fn replicas_by_tablet_id(&self, tablet_id: TabletId) -> Vec<Arc<Replica>> {
        self.replicas
            .get(&tablet_id)
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, tablet_id: TabletId) -> bool {
        self.tablet_meta.contains_key(&tablet_id)
    }

    pub fn tablet_count(&self) -> usize {
        self.tablet_meta.len()
    }
}
