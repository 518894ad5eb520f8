//! On-disk layouts of the file proxy and the module cache.
//!
//! Module paths and versions are escaped before they become path components:
//! every upper-case ASCII letter is written as `!` followed by its lower-case
//! form, so that case-insensitive file systems keep distinct modules apart.
//! Keys are checked first; a path that could leave the layout root is refused.

use std::path::PathBuf;

use modfetch_core::{CacheError, ModuleKey};

/// Escape a module path or version for use in a file name.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch.is_ascii_uppercase() {
            out.push('!');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Check that `path` is a well-formed module path.
///
/// A module path is a non-empty `/`-separated list of elements, none of
/// them empty, `.` or `..`, with no backslash.
pub fn check_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("empty module path".to_string());
    }
    if path.contains('\\') {
        return Err(format!("malformed module path {path:?}: contains backslash"));
    }
    for elem in path.split('/') {
        if elem.is_empty() || elem == "." || elem == ".." {
            return Err(format!(
                "malformed module path {path:?}: invalid path element {elem:?}"
            ));
        }
    }
    Ok(())
}

/// Check that `version` can be used as a single file name component.
pub fn check_version(version: &str) -> Result<(), String> {
    if version.is_empty() || version == "." || version == ".." || version.contains(['/', '\\']) {
        return Err(format!("malformed module version {version:?}"));
    }
    Ok(())
}

fn check_key(key: &ModuleKey) -> Result<(), CacheError> {
    check_path(&key.path)
        .and_then(|()| check_version(&key.version))
        .map_err(CacheError::other)
}

fn checked_path(path: &str) -> Result<String, CacheError> {
    check_path(path).map_err(CacheError::other)?;
    Ok(escape(path))
}

/// Read-only file proxy: `<root>/<escaped path>/@v/<version>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyLayout {
    root: PathBuf,
}

impl ProxyLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding every version file of `path`.
    pub fn version_dir(&self, path: &str) -> Result<PathBuf, CacheError> {
        Ok(self.root.join(checked_path(path)?).join("@v"))
    }

    /// The version list of `path`, one version per line.
    pub fn list_file(&self, path: &str) -> Result<PathBuf, CacheError> {
        Ok(self.version_dir(path)?.join("list"))
    }

    /// An artifact of `key` with the given extension.
    pub fn file(&self, key: &ModuleKey, ext: &str) -> Result<PathBuf, CacheError> {
        check_key(key)?;
        Ok(self
            .version_dir(&key.path)?
            .join(format!("{}.{ext}", escape(&key.version))))
    }
}

/// Writable module cache.
///
/// Downloaded artifacts live under `<root>/download/<escaped path>/@v/`,
/// extracted trees under `<root>/<escaped path>@<escaped version>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// A downloaded artifact of `key` with the given extension.
    pub fn download_file(&self, key: &ModuleKey, ext: &str) -> Result<PathBuf, CacheError> {
        check_key(key)?;
        Ok(self
            .root
            .join("download")
            .join(escape(&key.path))
            .join("@v")
            .join(format!("{}.{ext}", escape(&key.version))))
    }

    /// The extracted source tree of `key`.
    pub fn extract_dir(&self, key: &ModuleKey) -> Result<PathBuf, CacheError> {
        check_key(key)?;
        Ok(self
            .root
            .join(format!("{}@{}", escape(&key.path), escape(&key.version))))
    }
}
