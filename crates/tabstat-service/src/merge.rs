//! Applies `get_tablet_stats` responses to catalog replicas.

use tabstat_catalog::TabletInvertedIndex;
use tabstat_proto::GetTabletStatsRsp;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Records written onto a replica.
    pub merged: usize,
    /// Records whose tablet is gone or has no replica.
    pub skipped: usize,
}

impl MergeOutcome {
    pub fn absorb(&mut self, other: MergeOutcome) {
        self.merged += other.merged;
        self.skipped += other.skipped;
    }
}

/// Write the returned stats onto the first replica of each tablet.
///
/// Only the first replica is refreshed: replicas share the underlying
/// storage, so one measurement represents the tablet. Values overwrite
/// whatever the replica held before.
pub fn update_tablet_stat(index: &TabletInvertedIndex, rsp: &GetTabletStatsRsp) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    for stat in &rsp.tablet_stats {
        let tablet_id = stat.idx.tablet_id;
        if index.tablet_meta(tablet_id).is_none() {
            outcome.skipped += 1;
            continue;
        }
        let replicas = index.replicas_by_tablet_id(tablet_id);
        let Some(replica) = replicas.first() else {
            outcome.skipped += 1;
            continue;
        };
        replica.set_data_size(stat.data_size);
        replica.set_row_count(stat.num_rows);
        replica.set_rowset_count(stat.num_rowsets);
        replica.set_segment_count(stat.num_segments);
        replica.set_local_inverted_index_size(stat.index_size);
        replica.set_local_segment_size(stat.segment_size);
        outcome.merged += 1;
    }
    outcome
}
