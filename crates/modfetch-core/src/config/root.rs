//! Module root discovery.

use std::path::{Path, PathBuf};

/// File name of the main module manifest.
pub const MANIFEST_FILE: &str = "modfetch.json";

/// Walk up from `start` to the first directory containing [`MANIFEST_FILE`].
pub fn find_module_root(start: &Path) -> Option<PathBuf> {
    let found = start
        .ancestors()
        .find(|dir| dir.join(MANIFEST_FILE).is_file())
        .map(Path::to_path_buf);

    if let Some(ref root) = found {
        tracing::debug!(root = %root.display(), "found module root");
    }
    found
}
