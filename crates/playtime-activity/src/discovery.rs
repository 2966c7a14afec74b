use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ActivityError, Result};
use crate::types::DEFAULT_LOG_EXTENSION;

/// Keep paths whose extension is exactly `extension`, sorted.
pub fn filter_log_files<I>(paths: I, extension: &str) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut files: Vec<PathBuf> = paths
        .into_iter()
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some(extension))
        .collect();
    files.sort();
    files
}

/// Recursively find `*.log` files under `root`.
pub fn discover_log_files(root: &Path) -> Result<Vec<PathBuf>> {
    discover_log_files_with_extension(root, DEFAULT_LOG_EXTENSION)
}

/// Recursively find files under `root` ending in `.{extension}`.
pub fn discover_log_files_with_extension(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(ActivityError::MissingRoot(root.to_path_buf()));
    }

    let mut candidates = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        let file_type = entry.file_type();
        // Links are kept unless they resolve to a directory; a dangling link
        // stays so that reading it reports the failure.
        let keep = file_type.is_file() || (file_type.is_symlink() && !entry.path().is_dir());
        if keep {
            candidates.push(entry.into_path());
        }
    }

    let files = filter_log_files(candidates, extension);
    tracing::debug!(root = %root.display(), count = files.len(), "Discovered log files");
    Ok(files)
}
