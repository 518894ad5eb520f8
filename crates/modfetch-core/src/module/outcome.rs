//! Fetch outcomes and their output records.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::errors::FetchError;
use super::types::ModuleKey;

/// Result of fetching one module.
///
/// Stage fields are filled in as stages succeed. When `error` is set, the
/// fields of the failed stage and every later stage are unset, while earlier
/// stages stay populated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Module path.
    pub path: String,
    /// Module version.
    pub version: String,
    /// Terminal error, if any.
    pub error: Option<FetchError>,
    /// Cached version metadata file.
    pub info: Option<PathBuf>,
    /// Cached manifest file.
    pub manifest: Option<PathBuf>,
    /// Manifest checksum.
    pub manifest_sum: Option<String>,
    /// Cached archive file.
    pub archive: Option<PathBuf>,
    /// Archive checksum.
    pub archive_sum: Option<String>,
    /// Extracted source directory.
    pub dir: Option<PathBuf>,
}

impl FetchOutcome {
    /// Create an empty outcome for a module key.
    pub fn new(key: &ModuleKey) -> Self {
        Self {
            path: key.path.clone(),
            version: key.version.clone(),
            ..Self::default()
        }
    }

    /// Create an outcome that failed before fetching started.
    pub fn failed(key: &ModuleKey, error: FetchError) -> Self {
        Self {
            error: Some(error),
            ..Self::new(key)
        }
    }

    /// The work key of this outcome.
    pub fn key(&self) -> ModuleKey {
        ModuleKey::new(&self.path, &self.version)
    }

    /// Whether the fetch failed.
    pub const fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Whether every stage completed.
    pub const fn is_complete(&self) -> bool {
        self.error.is_none()
            && self.info.is_some()
            && self.manifest.is_some()
            && self.manifest_sum.is_some()
            && self.archive.is_some()
            && self.archive_sum.is_some()
            && self.dir.is_some()
    }

    /// Convert to the serializable output record.
    pub fn to_record(&self) -> OutcomeRecord {
        let display = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
        OutcomeRecord {
            path: self.path.clone(),
            version: self.version.clone(),
            error: self.error.as_ref().map(ToString::to_string),
            info: display(&self.info),
            manifest: display(&self.manifest),
            archive: display(&self.archive),
            dir: display(&self.dir),
            sum: self.archive_sum.clone(),
            manifest_sum: self.manifest_sum.clone(),
        }
    }
}

/// Structured output record for one module.
///
/// Empty fields are omitted from the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutcomeRecord {
    /// Module path.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    /// Module version.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Path of the cached metadata file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    /// Path of the cached manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,
    /// Path of the cached archive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,
    /// Path of the extracted source directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// Archive checksum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum: Option<String>,
    /// Manifest checksum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_sum: Option<String>,
}
