//! Module identity and descriptor types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Deduplication identity for one module version.
///
/// Two requests with an equal key are fetched once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleKey {
    /// Module path (opaque identifier, e.g. `example.org/a`).
    pub path: String,
    /// Concrete version (e.g. `v1.2.3`).
    pub version: String,
}

impl ModuleKey {
    /// Create a new key.
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            f.write_str(&self.path)
        } else {
            write!(f, "{}@{}", self.path, self.version)
        }
    }
}

/// A dependency as resolved by the module graph.
///
/// An empty `version` with no `error` means the module is the main module or
/// is replaced by a local directory: there is nothing to fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Module path.
    pub path: String,
    /// Resolved version, empty for the main module and directory replacements.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Replacement target. Chains are flattened by the graph resolver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<Box<ModuleDescriptor>>,
    /// Whether this is the main module.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub main: bool,
    /// Resolution error for this pattern, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Known versions (only when requested).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<String>,
    /// Newer available version (only when requested).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<Box<ModuleDescriptor>>,
}

impl ModuleDescriptor {
    /// Create a descriptor for a concrete module version.
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Create the descriptor of the main module.
    pub fn main_module(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            main: true,
            ..Self::default()
        }
    }

    /// Create a descriptor carrying a resolution error.
    pub fn with_error(
        path: impl Into<String>,
        version: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Attach a replacement target.
    #[must_use]
    pub fn replaced_by(mut self, replacement: Self) -> Self {
        self.replace = Some(Box::new(replacement));
        self
    }

    /// The descriptor to fetch: the replacement if present, otherwise self.
    ///
    /// Follows at most one level of replacement.
    pub fn resolved(&self) -> &Self {
        self.replace.as_deref().unwrap_or(self)
    }

    /// Whether there is nothing to fetch for this descriptor.
    pub fn is_nothing_to_fetch(&self) -> bool {
        let target = self.resolved();
        target.version.is_empty() && target.error.is_none()
    }

    /// The work key of the resolved descriptor.
    pub fn key(&self) -> ModuleKey {
        let target = self.resolved();
        ModuleKey::new(&target.path, &target.version)
    }
}

/// A diagnostic produced while resolving requests that is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Human-readable message.
    pub message: String,
}

impl Notice {
    /// Create a new notice.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
