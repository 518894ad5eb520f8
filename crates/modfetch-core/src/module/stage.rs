//! Fetch pipeline stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of the per-module fetch pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Version metadata (`.info`).
    Info,
    /// Module manifest.
    Manifest,
    /// Checksum of the manifest.
    ManifestChecksum,
    /// Module archive.
    Archive,
    /// Checksum of the archive.
    ArchiveChecksum,
    /// Extracted source directory.
    Extract,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Self; 6] = [
        Self::Info,
        Self::Manifest,
        Self::ManifestChecksum,
        Self::Archive,
        Self::ArchiveChecksum,
        Self::Extract,
    ];

    /// Short label used in error messages and logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Manifest => "manifest",
            Self::ManifestChecksum => "manifest checksum",
            Self::Archive => "archive",
            Self::ArchiveChecksum => "archive checksum",
            Self::Extract => "extract",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
