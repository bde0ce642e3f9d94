use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore as TokioSemaphore};

/// A counting semaphore wrapping tokio's Semaphore.
///
/// Cloning shares the same permit pool.
#[derive(Clone)]
pub struct Semaphore {
    inner: Arc<TokioSemaphore>,
    permits: usize,
}

impl Semaphore {
    pub fn new(permits: usize) -> Self {
        Self {
            inner: Arc::new(TokioSemaphore::new(permits)),
            permits,
        }
    }

    /// Wait for a permit. Returns `None` if the underlying pool is closed.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        self.inner.clone().acquire_owned().await.ok()
    }

    /// Total permits the semaphore was created with.
    pub fn capacity(&self) -> usize {
        self.permits
    }
}
