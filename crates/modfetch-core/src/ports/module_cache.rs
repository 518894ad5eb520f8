//! Module cache port.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::module::{CacheError, ModuleKey};

/// Retrieves and verifies the artifacts of one module version.
///
/// Every operation is keyed by (path, version), idempotent, and safe to call
/// concurrently for distinct keys. Implementations serialise work on the
/// same key internally.
#[async_trait]
pub trait ModuleCachePort: Send + Sync {
    /// Fetch the version metadata file; returns its local path.
    async fn fetch_info(&self, key: &ModuleKey) -> Result<PathBuf, CacheError>;

    /// Fetch the module manifest; returns its local path.
    async fn fetch_manifest(&self, key: &ModuleKey) -> Result<PathBuf, CacheError>;

    /// Checksum of the module manifest.
    async fn manifest_checksum(&self, key: &ModuleKey) -> Result<String, CacheError>;

    /// Fetch the module archive; returns its local path.
    async fn fetch_archive(&self, key: &ModuleKey) -> Result<PathBuf, CacheError>;

    /// Checksum of the module archive.
    async fn archive_checksum(&self, key: &ModuleKey) -> Result<String, CacheError>;

    /// Extract the module archive; returns the source directory.
    async fn materialize_dir(&self, key: &ModuleKey) -> Result<PathBuf, CacheError>;
}
