//! Conversions from foreign errors into `CacheError`, with path context.

use std::io;
use std::path::Path;

use modfetch_core::CacheError;

/// Map an I/O error on `path`. Missing files become `NotFound`.
pub fn io_error(path: &Path, err: &io::Error) -> CacheError {
    if err.kind() == io::ErrorKind::NotFound {
        return CacheError::not_found(path.display().to_string());
    }
    CacheError::io(format!("{:?}", err.kind()), format!("{}: {err}", path.display()))
}

/// Map a zip error on `path`.
pub fn zip_error(path: &Path, err: &zip::result::ZipError) -> CacheError {
    match err {
        zip::result::ZipError::Io(inner) => io_error(path, inner),
        other => CacheError::invalid_archive(format!("{}: {other}", path.display())),
    }
}
