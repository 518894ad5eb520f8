//! Module domain types.
//!
//! - [`ModuleDescriptor`] - a resolved dependency as produced by the graph port
//! - [`ModuleKey`] - the (path, version) identity used for deduplication
//! - [`FetchOutcome`] - the per-module result of the fetch pipeline
//! - [`OutcomeRecord`] - the serializable output form of an outcome

mod errors;
mod outcome;
mod stage;
mod types;

pub use errors::{CacheError, FetchError};
pub use outcome::{FetchOutcome, OutcomeRecord};
pub use stage::Stage;
pub use types::{ModuleDescriptor, ModuleKey, Notice};
