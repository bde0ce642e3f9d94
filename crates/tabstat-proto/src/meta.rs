//! Tablet statistics RPC types.
//!
//! Service method:
//!   get_tablet_stats(GetTabletStatsReq, GetTabletStatsRsp)
//!
//! The response carries its own status. A non-OK status does not imply the
//! record list is empty; callers decide whether to use partial results.

use serde::{Deserialize, Serialize};
use tabstat_types::{
    status_code, status_code_t, DbId, IndexId, PartitionId, StatusCode, TableId, TabletId,
};

// ---------------------------------------------------------------------------
// TabletIndex
// ---------------------------------------------------------------------------

/// Full catalog path of one tablet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TabletIndex {
    pub db_id: DbId,
    pub table_id: TableId,
    pub index_id: IndexId,
    pub partition_id: PartitionId,
    pub tablet_id: TabletId,
}

// ---- GetTabletStats ----

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetTabletStatsReq {
    pub tablet_idx: Vec<TabletIndex>,
}

impl GetTabletStatsReq {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tablet_idx(&mut self, idx: TabletIndex) {
        self.tablet_idx.push(idx);
    }

    pub fn tablet_idx_count(&self) -> usize {
        self.tablet_idx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tablet_idx.is_empty()
    }
}

/// Statistics of one tablet as measured by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TabletStats {
    pub idx: TabletIndex,
    pub data_size: i64,
    pub num_rows: i64,
    pub num_rowsets: i64,
    pub num_segments: i64,
    /// Size of secondary index files.
    pub index_size: i64,
    /// Size of segment data files.
    pub segment_size: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetaServiceStatus {
    pub code: status_code_t,
    pub msg: String,
}

impl MetaServiceStatus {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn error(code: status_code_t, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == StatusCode::OK
    }

    pub fn describe(&self) -> String {
        format!("{}({}) {}", status_code::to_string(self.code), self.code, self.msg)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetTabletStatsRsp {
    pub status: MetaServiceStatus,
    pub tablet_stats: Vec<TabletStats>,
}
