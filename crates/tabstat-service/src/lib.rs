//! Tablet statistics daemon.
//!
//! Every cycle the daemon walks the catalog and batches every tablet of every
//! managed table into `get_tablet_stats` requests, fans the batches out to the
//! metadata service on a bounded worker pool, and writes the returned numbers
//! onto the tablets' first replicas. A second walk then rolls replica values
//! up through index, partition and table, publishes a fresh per-table
//! statistics map with a single pointer swap, and pushes cluster-wide
//! min/max/avg sizes into the metrics registry.

pub mod aggregation;
pub mod config;
pub mod daemon;
pub mod dispatcher;
pub mod merge;
pub mod metrics;
pub mod request_builder;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod test_util;

pub use aggregation::{aggregate, AggregationResult, ClusterSizeMetrics, Extremum};
pub use config::TabletStatConfig;
pub use daemon::{CycleReport, TabletStatMgr};
pub use dispatcher::{DispatchSummary, TabletStatDispatcher};
pub use merge::{update_tablet_stat, MergeOutcome};
pub use metrics::TabletStatMetrics;
pub use request_builder::build_requests;
pub use snapshot::{StatsSnapshot, StatsSnapshotCell};
