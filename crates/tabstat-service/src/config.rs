//! Tunables of the tablet stats daemon, read from the `[tablet_stat]` section.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tabstat_config::Config;

/// Settings of the tablet stats daemon.
#[derive(Clone, Debug, PartialEq, Eq, Config, Serialize, Deserialize)]
#[serde(default)]
pub struct TabletStatConfig {
    /// Period of the stats cycle. Read once when the loop starts.
    #[config(default = 60, min = 1)]
    pub tablet_stat_update_interval_second: u64,

    /// Size of the process-wide RPC worker pool. Fixed at startup.
    #[config(default = 4, min = 1, max = 1024)]
    pub max_get_tablet_stat_task_threads_num: usize,

    /// Maximum tablets per `get_tablet_stats` request.
    #[config(default = 1000, min = 1, hot_updated)]
    pub get_tablet_stat_batch_size: usize,
}

impl TabletStatConfig {
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.tablet_stat_update_interval_second)
    }
}
