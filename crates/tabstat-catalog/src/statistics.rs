use serde::{Deserialize, Serialize};

/// Aggregated storage statistics of one table, rebuilt every stats cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStatistics {
    pub db_name: String,
    pub table_name: String,
    /// Sum over tablets of the largest replica data size.
    pub data_size: i64,
    /// Sum of data sizes over every replica of every tablet.
    pub total_replica_data_size: i64,
    pub replica_count: i64,
    pub row_count: i64,
    pub rowset_count: i64,
    pub segment_count: i64,
    pub local_index_size: i64,
    pub local_segment_size: i64,
    /// Reserved, always zero.
    pub remote_index_size: i64,
    /// Reserved, always zero.
    pub remote_segment_size: i64,
}
