//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the download pipeline expects from the
//! module graph and the module cache. They contain no implementation details
//! and use only domain types.
//!
//! # Design Rules
//!
//! - No filesystem layout or proxy protocol in any signature
//! - Per-module failures are values, never panics
//! - Implementations must be safe for concurrent use (`Send + Sync`)

pub mod module_cache;
pub mod module_graph;

pub use module_cache::ModuleCachePort;
pub use module_graph::{ListOptions, ModuleGraphPort};
