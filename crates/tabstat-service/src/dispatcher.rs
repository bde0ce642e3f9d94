//! Parallel fan-out of stat requests to the metadata service.

use std::sync::Arc;
use tabstat_catalog::InternalCatalog;
use tabstat_proto::{GetTabletStatsReq, GetTabletStatsRsp};
use tabstat_stubs::IMetaServiceStub;
use tabstat_utils::Semaphore;

use crate::merge::{update_tablet_stat, MergeOutcome};

/// What happened to the batches of one dispatch round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub batches: usize,
    pub tablets_requested: usize,
    /// OK status; records merged.
    pub succeeded: usize,
    /// Transport failure; nothing merged.
    pub failed: usize,
    /// Non-OK status; records present were still merged.
    pub remote_errors: usize,
    /// Worker task panicked or was cancelled before reporting.
    pub join_failed: usize,
    pub merge: MergeOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchResult {
    Succeeded,
    Failed,
    RemoteError,
}

/// Sends stat requests on a bounded pool of concurrent calls.
///
/// The pool is created once and shared by every cycle.
pub struct TabletStatDispatcher {
    stub: Arc<dyn IMetaServiceStub>,
    catalog: Arc<InternalCatalog>,
    pool: Semaphore,
}

impl TabletStatDispatcher {
    pub fn new(stub: Arc<dyn IMetaServiceStub>, catalog: Arc<InternalCatalog>, threads: usize) -> Self {
        Self {
            stub,
            catalog,
            pool: Semaphore::new(threads.max(1)),
        }
    }

    pub fn pool_size(&self) -> usize {
        self.pool.capacity()
    }

    /// Send every request and merge the responses. Returns once all calls
    /// have finished; one failing call never affects the others.
    pub async fn dispatch(&self, requests: Vec<GetTabletStatsReq>) -> DispatchSummary {
        let mut summary = DispatchSummary {
            batches: requests.len(),
            tablets_requested: requests.iter().map(|r| r.tablet_idx_count()).sum(),
            ..Default::default()
        };

        let mut handles = Vec::with_capacity(requests.len());
        for req in requests {
            let stub = self.stub.clone();
            let catalog = self.catalog.clone();
            let pool = self.pool.clone();
            handles.push(tokio::spawn(async move {
                let Some(_permit) = pool.acquire().await else {
                    tracing::warn!("tablet stat worker pool closed, batch dropped");
                    return (BatchResult::Failed, MergeOutcome::default());
                };
                fetch_and_merge(&*stub, &catalog, req).await
            }));
        }

        for handle in handles {
            match handle.await {
                Ok((result, merge)) => {
                    match result {
                        BatchResult::Succeeded => summary.succeeded += 1,
                        BatchResult::Failed => summary.failed += 1,
                        BatchResult::RemoteError => summary.remote_errors += 1,
                    }
                    summary.merge.absorb(merge);
                }
                Err(e) => {
                    tracing::error!(error = %e, "error waiting for get tablet stats task");
                    summary.join_failed += 1;
                }
            }
        }
        summary
    }
}

async fn fetch_and_merge(
    stub: &dyn IMetaServiceStub,
    catalog: &InternalCatalog,
    req: GetTabletStatsReq,
) -> (BatchResult, MergeOutcome) {
    let tablets = req.tablet_idx_count();
    let rsp = match stub.get_tablet_stats(req).await {
        Ok(rsp) => rsp,
        Err(status) => {
            tracing::warn!(
                tablets,
                transport = status.is_transport_error(),
                error = %status,
                "failed to get tablet stats"
            );
            return (BatchResult::Failed, MergeOutcome::default());
        }
    };

    let result = if rsp.status.is_ok() {
        BatchResult::Succeeded
    } else {
        tracing::warn!(
            tablets,
            status = %rsp.status.describe(),
            records = rsp.tablet_stats.len(),
            "get tablet stats returned failure status"
        );
        BatchResult::RemoteError
    };

    log_records(&rsp);
    (result, update_tablet_stat(catalog.inverted_index(), &rsp))
}

fn log_records(rsp: &GetTabletStatsRsp) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    for stat in &rsp.tablet_stats {
        tracing::debug!(
            db_id = *stat.idx.db_id,
            table_id = *stat.idx.table_id,
            index_id = *stat.idx.index_id,
            tablet_id = *stat.idx.tablet_id,
            data_size = stat.data_size,
            "tablet stat"
        );
    }
}
