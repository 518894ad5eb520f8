//! Core domain types and port definitions for modfetch.
//!
//! This crate has no knowledge of where module bytes come from. It defines:
//!
//! - [`module`] - descriptors, work keys, fetch outcomes and output records
//! - [`ports`] - the module graph and module cache abstractions
//! - [`config`] - module mode, module root discovery and cache locations
//!
//! Adapters (`modfetch-cache`) implement the ports; the pipeline
//! (`modfetch-download`) drives them.

#![deny(unused_crate_dependencies)]

pub mod config;
pub mod module;
pub mod ports;

// Re-export commonly used types for convenience
pub use config::{
    ConfigError, DEFAULT_CONCURRENCY, MANIFEST_FILE, MainModule, ModuleContext, ModuleMode,
    ResolvedPaths,
};
pub use module::{
    CacheError, FetchError, FetchOutcome, ModuleDescriptor, ModuleKey, Notice, OutcomeRecord,
    Stage,
};
pub use ports::{ListOptions, ModuleCachePort, ModuleGraphPort};
