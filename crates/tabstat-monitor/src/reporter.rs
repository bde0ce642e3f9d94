use crate::sample::Sample;

/// Sink for collected samples.
pub trait Reporter: Send + Sync {
    fn report(&self, samples: &[Sample]);
}

/// Writes samples as structured `info` events, optionally only those whose
/// name starts with a prefix.
#[derive(Debug, Clone, Default)]
pub struct LogReporter {
    prefix: Option<String>,
}

impl LogReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    fn accepts(&self, sample: &Sample) -> bool {
        self.prefix
            .as_deref()
            .map_or(true, |p| sample.name.starts_with(p))
    }

    /// Samples this reporter would emit.
    pub fn select<'a>(&'a self, samples: &'a [Sample]) -> impl Iterator<Item = &'a Sample> + 'a {
        samples.iter().filter(move |s| self.accepts(s))
    }
}

impl Reporter for LogReporter {
    fn report(&self, samples: &[Sample]) {
        for sample in self.select(samples) {
            if sample.tags.is_empty() {
                tracing::info!(name = %sample.name, value = sample.value, "metric");
            } else {
                tracing::info!(name = %sample.name, value = sample.value, tags = ?sample.tags, "metric");
            }
        }
    }
}
