//! Content checksums in `h1:` form.
//!
//! `h1:` is followed by the standard base64 encoding of a SHA-256 digest.
//! Manifests are hashed directly; archives are hashed over a sorted listing
//! of `<sha256 hex>  <entry name>` lines so that entry order in the zip does
//! not matter.

use std::fs::File;
use std::io;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};
use zip::ZipArchive;

use modfetch_core::CacheError;

use crate::error::{io_error, zip_error};

const PREFIX: &str = "h1:";

/// Checksum of a byte buffer.
pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{PREFIX}{}", STANDARD.encode(Sha256::digest(bytes)))
}

/// Checksum of the files inside a zip archive.
pub fn hash_archive(path: &Path) -> Result<String, CacheError> {
    let file = File::open(path).map_err(|e| io_error(path, &e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| zip_error(path, &e))?;

    let mut listing = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| zip_error(path, &e))?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        if name.contains('\n') {
            return Err(CacheError::invalid_archive(format!(
                "{}: entry name contains newline",
                path.display()
            )));
        }
        let mut hasher = Sha256::new();
        io::copy(&mut entry, &mut hasher).map_err(|e| io_error(path, &e))?;
        listing.push((name, format!("{:x}", hasher.finalize())));
    }
    listing.sort();

    let mut summary = Sha256::new();
    for (name, digest) in &listing {
        summary.update(format!("{digest}  {name}\n").as_bytes());
    }
    Ok(format!("{PREFIX}{}", STANDARD.encode(summary.finalize())))
}
