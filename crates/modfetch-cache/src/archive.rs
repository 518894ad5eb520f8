//! Module archive extraction.

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;
use zip::ZipArchive;

use modfetch_core::{CacheError, ModuleKey};

use crate::error::{io_error, zip_error};

/// Reject absolute paths and `..` so entries cannot escape the target.
fn safe_rel_path(name: &str) -> Result<PathBuf, CacheError> {
    let mut out = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(seg) => out.push(seg),
            Component::CurDir => {}
            Component::Prefix(_) | Component::RootDir | Component::ParentDir => {
                return Err(CacheError::invalid_archive(format!(
                    "unsafe path in archive entry: {name}"
                )));
            }
        }
    }
    Ok(out)
}

/// Extract the archive of `key` at `zip_path` into `dst`.
///
/// Module archives conventionally place every file under `path@version/`;
/// that prefix is stripped when all entries carry it. Files are unpacked
/// into a uniquely named sibling temporary directory that is renamed into
/// place, so `dst` either does not exist or is complete.
pub fn extract_archive(zip_path: &Path, dst: &Path, key: &ModuleKey) -> Result<(), CacheError> {
    let file = File::open(zip_path).map_err(|e| io_error(zip_path, &e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| zip_error(zip_path, &e))?;

    let prefix = format!("{}@{}/", key.path, key.version);
    let strip = !zip.is_empty() && zip.file_names().all(|name| name.starts_with(&prefix));

    let parent = dst
        .parent()
        .ok_or_else(|| CacheError::other(format!("no parent directory for {}", dst.display())))?;
    fs::create_dir_all(parent).map_err(|e| io_error(parent, &e))?;
    let tmp = tempfile::Builder::new()
        .prefix(".tmp-")
        .tempdir_in(parent)
        .map_err(|e| io_error(parent, &e))?;

    if let Err(err) = unpack(&mut zip, zip_path, tmp.path(), strip.then_some(prefix.as_str())) {
        discard(tmp);
        return Err(err);
    }

    if dst.exists() {
        discard(tmp);
        return Ok(());
    }
    if let Err(e) = fs::rename(tmp.path(), dst) {
        discard(tmp);
        // Another extractor may have won the rename.
        if dst.is_dir() {
            return Ok(());
        }
        return Err(io_error(dst, &e));
    }
    Ok(())
}

/// Remove an unused temporary directory, logging failures.
fn discard(tmp: TempDir) {
    let path = tmp.path().to_path_buf();
    if let Err(e) = tmp.close() {
        tracing::warn!(
            target: "modfetch.cache",
            dir = %path.display(),
            error = %e,
            "failed to remove temporary directory"
        );
    }
}

fn unpack(
    zip: &mut ZipArchive<File>,
    zip_path: &Path,
    dst: &Path,
    prefix: Option<&str>,
) -> Result<(), CacheError> {
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| zip_error(zip_path, &e))?;
        let name = entry.name().to_string();
        let name = prefix
            .and_then(|p| name.strip_prefix(p))
            .unwrap_or(&name);
        let rel = safe_rel_path(name)?;
        if rel.as_os_str().is_empty() {
            continue;
        }

        let out = dst.join(rel);
        if entry.is_dir() {
            fs::create_dir_all(&out).map_err(|e| io_error(&out, &e))?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, &e))?;
        }
        let mut writer = File::create(&out).map_err(|e| io_error(&out, &e))?;
        io::copy(&mut entry, &mut writer).map_err(|e| io_error(&out, &e))?;
    }
    Ok(())
}
