//! Process-local metrics: named counters and gauges collected into samples.

pub mod metrics;
pub mod registry;
pub mod reporter;
pub mod sample;

pub use metrics::{Counter, Gauge};
pub use registry::MetricsRegistry;
pub use reporter::{LogReporter, Reporter};
pub use sample::Sample;
