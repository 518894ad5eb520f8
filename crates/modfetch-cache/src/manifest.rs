//! Main module manifest (`modfetch.json`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use modfetch_core::{ConfigError, MANIFEST_FILE, ModuleDescriptor};

use crate::layout::check_path;

/// Parsed main module manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Path of the main module.
    pub module: String,
    /// Direct requirements.
    #[serde(default)]
    pub require: Vec<Requirement>,
    /// Replacement directives.
    #[serde(default)]
    pub replace: Vec<Replacement>,
}

/// A required module version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub path: String,
    pub version: String,
}

/// Replaces a module (optionally one version of it) with another module or
/// a local directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub path: String,
    /// Only this version is replaced; every version when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub with: ReplaceTarget,
}

/// Target of a replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplaceTarget {
    /// Another module version.
    Module { path: String, version: String },
    /// A directory on disk; nothing to fetch.
    Dir { dir: String },
}

impl Manifest {
    /// Load `modfetch.json` from a module root directory.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(MANIFEST_FILE);
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Manifest {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Self::parse(&text).map_err(|reason| ConfigError::Manifest { path, reason })
    }

    /// Parse and validate manifest text.
    pub fn parse(text: &str) -> Result<Self, String> {
        let manifest: Self = serde_json::from_str(text).map_err(|e| e.to_string())?;
        if manifest.module.trim().is_empty() {
            return Err("missing module path".to_string());
        }
        check_path(&manifest.module)?;
        if let Some(req) = manifest
            .require
            .iter()
            .find(|r| r.path.is_empty() || r.version.is_empty())
        {
            return Err(format!("incomplete requirement {:?}@{:?}", req.path, req.version));
        }
        for req in &manifest.require {
            check_path(&req.path)?;
        }
        Ok(manifest)
    }

    /// Version of `path` required by the main module.
    pub fn required_version(&self, path: &str) -> Option<&str> {
        self.require
            .iter()
            .find(|r| r.path == path)
            .map(|r| r.version.as_str())
    }

    /// Requirements ordered by module path.
    pub fn sorted_requirements(&self) -> Vec<&Requirement> {
        let mut reqs: Vec<&Requirement> = self.require.iter().collect();
        reqs.sort_by(|a, b| a.path.cmp(&b.path));
        reqs
    }

    /// The replacement descriptor for `path@version`, if any.
    ///
    /// A version-specific directive wins over a path-wide one. Directory
    /// targets produce a descriptor with an empty version.
    pub fn replacement_for(&self, path: &str, version: &str) -> Option<ModuleDescriptor> {
        let exact = self
            .replace
            .iter()
            .find(|r| r.path == path && r.version.as_deref() == Some(version));
        let any = || {
            self.replace
                .iter()
                .find(|r| r.path == path && r.version.is_none())
        };
        let directive = exact.or_else(any)?;
        Some(match &directive.with {
            ReplaceTarget::Module { path, version } => ModuleDescriptor::new(path, version),
            ReplaceTarget::Dir { dir } => ModuleDescriptor::new(dir, ""),
        })
    }
}
