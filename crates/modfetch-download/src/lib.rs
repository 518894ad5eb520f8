//! Concurrent module download pipeline.
//!
//! Turns download requests into scheduled fetch operations and aggregates
//! their outcomes:
//!
//! - `resolver` - expands patterns through the module graph port
//! - `queue` - the deduplicating bounded scheduler ([`Work`])
//! - `manager` - the per-module fetch pipeline and the top-level run
//! - `report` - order-preserving aggregation and rendering
//!
//! The entry point is [`download_modules`].

#![deny(unused_crate_dependencies)]

// Re-export core types for convenience
pub use modfetch_core::{
    CacheError, DEFAULT_CONCURRENCY, FetchError, FetchOutcome, ModuleCachePort, ModuleContext,
    ModuleGraphPort, ModuleKey, Notice, OutcomeRecord, Stage,
};

mod manager;
mod queue;
mod report;
mod resolver;

pub use manager::{DownloadDeps, DownloadRequest, OutcomeSlot, download_modules, fetch_module};
pub use queue::Work;
pub use report::DownloadReport;
pub use resolver::{ModuleRequest, Resolution, resolve_requests};
