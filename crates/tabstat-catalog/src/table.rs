use arc_swap::ArcSwapOption;
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;
use tabstat_types::{TableId, TabletId};

use crate::partition::Partition;
use crate::statistics::TableStatistics;

/// Storage flavour of a table.
#[derive(Debug)]
pub enum TableKind {
    /// Data stored and replicated by this cluster's own storage layer.
    Managed(ManagedTable),
    /// Federated table whose data lives elsewhere (e.g. a lake catalog).
    External { source: String },
}

#[derive(Debug)]
pub struct Table {
    id: TableId,
    name: String,
    kind: TableKind,
    statistics: ArcSwapOption<TableStatistics>,
}

impl Table {
    pub fn managed(id: TableId, name: impl Into<String>, partitions: Vec<Arc<Partition>>) -> Self {
        Self::with_kind(id, name, TableKind::Managed(ManagedTable::new(partitions)))
    }

    pub fn external(id: TableId, name: impl Into<String>, source: impl Into<String>) -> Self {
        Self::with_kind(id, name, TableKind::External { source: source.into() })
    }

    fn with_kind(id: TableId, name: impl Into<String>, kind: TableKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            statistics: ArcSwapOption::empty(),
        }
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the managed view of this table, `None` for external tables.
    pub fn as_managed(&self) -> Option<&ManagedTable> {
        match &self.kind {
            TableKind::Managed(m) => Some(m),
            TableKind::External { .. } => None,
        }
    }

    /// Last statistics published for this table, if any.
    pub fn statistics(&self) -> Option<Arc<TableStatistics>> {
        self.statistics.load_full()
    }

    pub fn set_statistics(&self, stats: Arc<TableStatistics>) {
        self.statistics.store(Some(stats));
    }
}

#[derive(Debug, Default)]
struct ManagedTableInner {
    partitions: Vec<Arc<Partition>>,
    dropped: bool,
}

/// The partition tree of a managed table, guarded by the table lock.
#[derive(Debug)]
pub struct ManagedTable {
    inner: RwLock<ManagedTableInner>,
}

impl ManagedTable {
    fn new(partitions: Vec<Arc<Partition>>) -> Self {
        Self {
            inner: RwLock::new(ManagedTableInner {
                partitions,
                dropped: false,
            }),
        }
    }

    /// Acquire the shared table lock. Released when the guard drops.
    pub fn read_lock(&self) -> TableReadGuard<'_> {
        TableReadGuard {
            inner: self.inner.read(),
        }
    }

    /// Acquire the shared table lock unless the table has been dropped.
    pub fn try_read_lock_if_exists(&self) -> Option<TableReadGuard<'_>> {
        let inner = self.inner.read();
        if inner.dropped {
            return None;
        }
        Some(TableReadGuard { inner })
    }

    /// Run `f` on the partition list under the exclusive lock. Returns
    /// `None` without calling `f` once the table is dropped.
    pub(crate) fn with_partitions_mut<R>(&self, f: impl FnOnce(&mut Vec<Arc<Partition>>) -> R) -> Option<R> {
        let mut inner = self.inner.write();
        if inner.dropped {
            return None;
        }
        Some(f(&mut inner.partitions))
    }

    /// Flag the table as dropped under the exclusive lock and return the
    /// tablet ids it owned.
    pub fn mark_dropped(&self) -> Vec<TabletId> {
        let mut inner = self.inner.write();
        inner.dropped = true;
        inner
            .partitions
            .iter()
            .flat_map(|p| p.indices().iter())
            .flat_map(|idx| idx.tablet_ids_in_order())
            .collect()
    }
}

pub struct TableReadGuard<'a> {
    inner: RwLockReadGuard<'a, ManagedTableInner>,
}

impl TableReadGuard<'_> {
    pub fn partitions(&self) -> &[Arc<Partition>] {
        &self.inner.partitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{IndexState, MaterializedIndex};
    use crate::tablet::Tablet;
    use tabstat_types::{IndexId, PartitionId};

    fn one_partition_table() -> Table {
        let tablets = vec![
            Arc::new(Tablet::new(TabletId(1), Vec::new())),
            Arc::new(Tablet::new(TabletId(2), Vec::new())),
        ];
        let idx = Arc::new(MaterializedIndex::new(IndexId(1), IndexState::Visible, tablets));
        let p = Arc::new(Partition::new(PartitionId(1), "p1", vec![idx]));
        Table::managed(TableId(100), "orders", vec![p])
    }

    #[test]
    fn test_external_table_is_not_managed() {
        let t = Table::external(TableId(1), "hive_events", "hms://lake");
        assert!(t.as_managed().is_none());
        assert!(matches!(&t.kind, TableKind::External { source } if source == "hms://lake"));
    }

    #[test]
    fn test_read_lock_exposes_partitions() {
        let t = one_partition_table();
        let m = t.as_managed().unwrap();
        let guard = m.read_lock();
        assert_eq!(guard.partitions().len(), 1);
        // Shared lock admits a second reader.
        assert!(m.try_read_lock_if_exists().is_some());
    }

    #[test]
    fn test_dropped_table_refuses_lock_if_exists() {
        let t = one_partition_table();
        let m = t.as_managed().unwrap();
        let tablets = m.mark_dropped();
        assert_eq!(tablets, vec![TabletId(1), TabletId(2)]);
        assert!(m.try_read_lock_if_exists().is_none());
        // The plain lock is still available to callers that do not care.
        assert_eq!(m.read_lock().partitions().len(), 1);
    }

    #[test]
    fn test_statistics_swap() {
        let t = one_partition_table();
        assert!(t.statistics().is_none());
        let stats = Arc::new(TableStatistics {
            data_size: 5,
            ..Default::default()
        });
        t.set_statistics(stats.clone());
        assert!(Arc::ptr_eq(&t.statistics().unwrap(), &stats));
    }

    #[test]
    fn test_partitions_frozen_after_drop() {
        let t = one_partition_table();
        let m = t.as_managed().unwrap();
        let added = m.with_partitions_mut(|parts| {
            parts.push(Arc::new(Partition::new(PartitionId(2), "p2", Vec::new())));
            parts.len()
        });
        assert_eq!(added, Some(2));

        m.mark_dropped();
        assert!(m.with_partitions_mut(|parts| parts.clear()).is_none());
        assert_eq!(m.read_lock().partitions().len(), 2);
    }
}
