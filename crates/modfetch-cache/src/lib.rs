//! File-system adapters for modfetch.
//!
//! - [`ManifestGraph`] implements `ModuleGraphPort` over the main module's
//!   `modfetch.json` and the proxy's version lists
//! - [`FileProxyCache`] implements `ModuleCachePort` by copying artifacts from
//!   a proxy directory into the module cache and extracting them there

#![deny(unused_crate_dependencies)]

mod archive;
mod cache;
mod checksum;
mod error;
mod graph;
mod layout;
mod manifest;

pub use cache::FileProxyCache;
pub use checksum::{hash_archive, hash_bytes};
pub use graph::{ManifestGraph, VersionQuery};
pub use layout::{CacheLayout, ProxyLayout, check_path, check_version, escape};
pub use manifest::{Manifest, ReplaceTarget, Replacement, Requirement};
