//! Message types exchanged with the remote metadata service.

pub mod meta;

pub use meta::{GetTabletStatsReq, GetTabletStatsRsp, MetaServiceStatus, TabletIndex, TabletStats};
