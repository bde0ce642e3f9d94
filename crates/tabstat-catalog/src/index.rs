use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use tabstat_types::{IndexId, TabletId};

use crate::tablet::Tablet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    /// Serving queries; included in stats.
    Visible,
    /// Being built by a schema change; not yet visible.
    Shadow,
}

/// A physical representation (base or rollup) of a partition's data.
#[derive(Debug)]
pub struct MaterializedIndex {
    id: IndexId,
    state: IndexState,
    tablets: Vec<Arc<Tablet>>,
    positions: HashMap<TabletId, usize>,
    row_count: AtomicI64,
    row_count_reported: AtomicBool,
}

impl MaterializedIndex {
    pub fn new(id: IndexId, state: IndexState, tablets: Vec<Arc<Tablet>>) -> Self {
        let positions = tablets.iter().enumerate().map(|(i, t)| (t.id(), i)).collect();
        Self {
            id,
            state,
            tablets,
            positions,
            row_count: AtomicI64::new(0),
            row_count_reported: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> IndexId {
        self.id
    }

    pub fn is_visible(&self) -> bool {
        self.state == IndexState::Visible
    }

    pub fn tablet_ids_in_order(&self) -> Vec<TabletId> {
        self.tablets.iter().map(|t| t.id()).collect()
    }

    pub fn tablet(&self, id: TabletId) -> Option<&Arc<Tablet>> {
        self.positions.get(&id).map(|&i| &self.tablets[i])
    }

    pub fn tablets(&self) -> &[Arc<Tablet>] {
        &self.tablets
    }

    pub fn tablet_count(&self) -> usize {
        self.tablets.len()
    }

    pub fn row_count(&self) -> i64 {
        self.row_count.load(Ordering::Relaxed)
    }

    pub fn set_row_count(&self, rows: i64) {
        self.row_count.store(rows, Ordering::Relaxed);
    }

    pub fn row_count_reported(&self) -> bool {
        self.row_count_reported.load(Ordering::Relaxed)
    }

    pub fn set_row_count_reported(&self, reported: bool) {
        self.row_count_reported.store(reported, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tablets(ids: &[i64]) -> Vec<Arc<Tablet>> {
        ids.iter().map(|&id| Arc::new(Tablet::new(TabletId(id), Vec::new()))).collect()
    }

    #[test]
    fn test_tablet_order_is_preserved() {
        let idx = MaterializedIndex::new(IndexId(1), IndexState::Visible, tablets(&[30, 10, 20]));
        assert_eq!(idx.tablet_ids_in_order(), vec![TabletId(30), TabletId(10), TabletId(20)]);
        assert_eq!(idx.tablet(TabletId(10)).unwrap().id(), TabletId(10));
        assert!(idx.tablet(TabletId(99)).is_none());
        assert_eq!(idx.tablet_count(), 3);
    }

    #[test]
    fn test_row_count_cache() {
        let idx = MaterializedIndex::new(IndexId(1), IndexState::Shadow, Vec::new());
        assert!(!idx.is_visible());
        assert!(!idx.row_count_reported());
        idx.set_row_count(42);
        idx.set_row_count_reported(true);
        assert_eq!(idx.row_count(), 42);
        assert!(idx.row_count_reported());
    }
}
