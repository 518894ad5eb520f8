//! Download run orchestration.
//!
//! Ties the resolver, scheduler and fetch pipeline together into one
//! download run.
//!
//! # Architecture
//!
//! - **Resolver**: produces the ordered request list and notices
//! - **Slots**: one per request, allocated in request order before anything runs
//! - **Work**: deduplicating bounded scheduler driving the fetch pipeline
//! - **Worker**: fetches one module, writes only to its own slot
//!
//! Reporting reads the slots back in allocation order, so output order is
//! independent of completion order.

mod worker;

use std::sync::Arc;

use modfetch_core::{
    DEFAULT_CONCURRENCY, FetchError, FetchOutcome, ModuleCachePort, ModuleContext,
    ModuleGraphPort, ModuleKey,
};

use crate::queue::Work;
use crate::report::DownloadReport;
use crate::resolver::resolve_requests;

pub use worker::{OutcomeSlot, fetch_module};

/// Ports required by a download run.
#[derive(Clone)]
pub struct DownloadDeps {
    /// Module graph used to resolve patterns.
    pub graph: Arc<dyn ModuleGraphPort>,
    /// Module cache used by the fetch pipeline.
    pub cache: Arc<dyn ModuleCachePort>,
}

/// Parameters of one download run.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Module mode and main module.
    pub context: ModuleContext,
    /// Patterns given by the user. Empty means `all` inside a module root.
    pub patterns: Vec<String>,
    /// Maximum number of concurrent module fetches.
    pub concurrency: usize,
}

impl DownloadRequest {
    /// Create a request with the default concurrency.
    pub const fn new(context: ModuleContext, patterns: Vec<String>) -> Self {
        Self {
            context,
            patterns,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Override the concurrency bound.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}

/// Resolve, fetch and aggregate one download run.
///
/// Returns `Err` only for run-level failures (configuration or usage).
/// Per-module failures are carried in the report, one outcome per resolved
/// module in resolution order.
pub async fn download_modules(
    deps: &DownloadDeps,
    request: &DownloadRequest,
) -> Result<DownloadReport, FetchError> {
    let resolution =
        resolve_requests(deps.graph.as_ref(), &request.context, &request.patterns).await?;

    let work: Arc<Work<ModuleKey, Arc<OutcomeSlot>>> = Arc::new(Work::new());
    let mut slots = Vec::with_capacity(resolution.requests.len());
    for req in resolution.requests {
        let slot = match req.error {
            Some(error) => {
                let outcome = FetchOutcome::failed(&req.key, error);
                Arc::new(OutcomeSlot::settled(req.key, outcome))
            }
            None => {
                let slot = Arc::new(OutcomeSlot::pending(req.key));
                work.add(slot.key().clone(), Arc::clone(&slot));
                slot
            }
        };
        slots.push(slot);
    }

    tracing::debug!(
        target: "modfetch.download",
        modules = slots.len(),
        scheduled = work.len(),
        concurrency = request.concurrency,
        "starting download run"
    );

    let cache = Arc::clone(&deps.cache);
    work.drain(request.concurrency, move |slot: Arc<OutcomeSlot>| {
        let cache = Arc::clone(&cache);
        async move {
            let outcome = fetch_module(cache.as_ref(), slot.key()).await;
            slot.store(outcome);
        }
    })
    .await;

    let outcomes: Vec<FetchOutcome> = slots.iter().map(|slot| slot.take()).collect();
    let report = DownloadReport::new(outcomes, resolution.notices);

    tracing::info!(
        target: "modfetch.download",
        modules = report.outcomes.len(),
        failed = report.failure_count(),
        "download run finished"
    );

    Ok(report)
}
