use parking_lot::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tabstat_types::{BackendId, ReplicaId, TabletId};

/// One physical copy of a tablet.
///
/// The stat fields are written by the stats merge and read by the
/// aggregation pass and arbitrary catalog readers, hence atomics.
#[derive(Debug)]
pub struct Replica {
    id: ReplicaId,
    backend_id: BackendId,
    data_size: AtomicI64,
    row_count: AtomicI64,
    rowset_count: AtomicI64,
    segment_count: AtomicI64,
    local_inverted_index_size: AtomicI64,
    local_segment_size: AtomicI64,
}

macro_rules! stat_field {
    ($get:ident, $set:ident) => {
        pub fn $get(&self) -> i64 {
            self.$get.load(Ordering::Relaxed)
        }

        pub fn $set(&self, value: i64) {
            self.$get.store(value, Ordering::Relaxed);
        }
    };
}

impl Replica {
    pub fn new(id: ReplicaId, backend_id: BackendId) -> Self {
        Self {
            id,
            backend_id,
            data_size: AtomicI64::new(0),
            row_count: AtomicI64::new(0),
            rowset_count: AtomicI64::new(0),
            segment_count: AtomicI64::new(0),
            local_inverted_index_size: AtomicI64::new(0),
            local_segment_size: AtomicI64::new(0),
        }
    }

    pub fn id(&self) -> ReplicaId {
        self.id
    }

    pub fn backend_id(&self) -> BackendId {
        self.backend_id
    }

    stat_field!(data_size, set_data_size);
    stat_field!(row_count, set_row_count);
    stat_field!(rowset_count, set_rowset_count);
    stat_field!(segment_count, set_segment_count);
    stat_field!(local_inverted_index_size, set_local_inverted_index_size);
    stat_field!(local_segment_size, set_local_segment_size);
}

/// Smallest replicated storage unit of a partition's index.
#[derive(Debug)]
pub struct Tablet {
    id: TabletId,
    replicas: RwLock<Vec<Arc<Replica>>>,
}

impl Tablet {
    pub fn new(id: TabletId, replicas: Vec<Arc<Replica>>) -> Self {
        Self {
            id,
            replicas: RwLock::new(replicas),
        }
    }

    pub fn id(&self) -> TabletId {
        self.id
    }

    /// Replicas in insertion order.
    pub fn replicas(&self) -> Vec<Arc<Replica>> {
        self.replicas.read().clone()
    }

    /// Reached through `InternalCatalog::add_replica` so the inverted index
    /// learns about the replica too.
    pub(crate) fn add_replica(&self, replica: Arc<Replica>) {
        self.replicas.write().push(replica);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replica_starts_zeroed() {
        let r = Replica::new(ReplicaId(1), BackendId(10));
        assert_eq!(r.id(), ReplicaId(1));
        assert_eq!(r.backend_id(), BackendId(10));
        assert_eq!(r.data_size(), 0);
        assert_eq!(r.local_segment_size(), 0);
    }

    #[test]
    fn test_replica_setters() {
        let r = Replica::new(ReplicaId(1), BackendId(10));
        r.set_data_size(100);
        r.set_row_count(7);
        r.set_rowset_count(2);
        r.set_segment_count(3);
        r.set_local_inverted_index_size(11);
        r.set_local_segment_size(89);
        assert_eq!(
            (r.data_size(), r.row_count(), r.rowset_count(), r.segment_count()),
            (100, 7, 2, 3)
        );
        assert_eq!(r.local_inverted_index_size(), 11);
        assert_eq!(r.local_segment_size(), 89);
    }

    #[test]
    fn test_tablet_keeps_replica_order() {
        let t = Tablet::new(TabletId(5), vec![Arc::new(Replica::new(ReplicaId(1), BackendId(1)))]);
        t.add_replica(Arc::new(Replica::new(ReplicaId(2), BackendId(2))));
        let ids: Vec<_> = t.replicas().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![ReplicaId(1), ReplicaId(2)]);
    }
}
