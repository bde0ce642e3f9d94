//! In-memory catalog of the metadata node.
//!
//! Databases own tables, managed tables own partitions, partitions own
//! materialized indices, indices own tablets and tablets own replicas. The
//! tablet inverted index maps a tablet id straight to its location and its
//! replicas without walking the hierarchy.
//!
//! Replica stat fields are atomics so the stats daemon can write them while
//! other readers walk the catalog.

pub mod catalog;
pub mod database;
pub mod index;
pub mod inverted_index;
pub mod partition;
pub mod statistics;
pub mod table;
pub mod tablet;

pub use catalog::InternalCatalog;
pub use database::Database;
pub use index::{IndexState, MaterializedIndex};
pub use inverted_index::{TabletInvertedIndex, TabletMeta};
pub use partition::Partition;
pub use statistics::TableStatistics;
pub use table::{ManagedTable, Table, TableKind, TableReadGuard};
pub use tablet::{Replica, Tablet};
