//! Remote metadata service stub trait and mock implementation.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tabstat_proto::{GetTabletStatsReq, GetTabletStatsRsp};
use tabstat_types::Result;

/// Client-side stub for the remote metadata service.
///
/// An `Err` means the call itself failed (connect, send, timeout). A remote
/// logical failure arrives as `Ok` with a non-OK `status` in the response.
#[async_trait]
pub trait IMetaServiceStub: Send + Sync {
    async fn get_tablet_stats(&self, req: GetTabletStatsReq) -> Result<GetTabletStatsRsp>;
}

// ---------------------------------------------------------------------------
// Mock implementation
// ---------------------------------------------------------------------------

type Handler<Req, Rsp> = Box<dyn Fn(Req) -> Result<Rsp> + Send + Sync>;

/// A configurable mock for [`IMetaServiceStub`].
///
/// The handler can be overridden with a closure. If no handler is installed
/// the mock returns an OK response without records. Every request is
/// recorded so tests can inspect batching.
pub struct MockMetaServiceStub {
    pub get_tablet_stats_handler: Mutex<Option<Handler<GetTabletStatsReq, GetTabletStatsRsp>>>,
    requests: Mutex<Vec<GetTabletStatsReq>>,
    calls: AtomicUsize,
}

impl MockMetaServiceStub {
    pub fn new() -> Self {
        Self {
            get_tablet_stats_handler: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Wrap in an `Arc` for convenient sharing.
    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn on_get_tablet_stats(
        &self,
        f: impl Fn(GetTabletStatsReq) -> Result<GetTabletStatsRsp> + Send + Sync + 'static,
    ) {
        *self.get_tablet_stats_handler.lock() = Some(Box::new(f));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, in arrival order.
    pub fn received_requests(&self) -> Vec<GetTabletStatsReq> {
        self.requests.lock().clone()
    }
}

impl Default for MockMetaServiceStub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IMetaServiceStub for MockMetaServiceStub {
    async fn get_tablet_stats(&self, req: GetTabletStatsReq) -> Result<GetTabletStatsRsp> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(req.clone());
        let guard = self.get_tablet_stats_handler.lock();
        match guard.as_ref() {
            Some(f) => f(req),
            None => Ok(GetTabletStatsRsp::default()),
        }
    }
}

/// Blanket implementation: `Arc<T>` delegates to `T` for any `T: IMetaServiceStub`.
#[async_trait]
impl<T: IMetaServiceStub + ?Sized> IMetaServiceStub for Arc<T> {
    async fn get_tablet_stats(&self, req: GetTabletStatsReq) -> Result<GetTabletStatsRsp> {
        (**self).get_tablet_stats(req).await
    }
}
