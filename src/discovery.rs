//! Input file discovery.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, ToolError};

/// Lists the regular files in `dir` whose extension is exactly `extension`.
///
/// Dot-files are skipped, as a shell glob would skip them. The result is
/// sorted by file name so sheet order is reproducible across runs.
pub fn list_input_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ToolError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if !path.is_file() {
            continue;
        }

        let hidden = path
            .file_name()
            .map(|name| name.to_string_lossy().starts_with('.'))
            .unwrap_or(true);
        if hidden {
            continue;
        }

        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == extension);
        if matches {
            files.push(path);
        }
    }

    files.sort_by(|lhs, rhs| lhs.file_name().cmp(&rhs.file_name()));
    debug!(directory = %dir.display(), count = files.len(), "discovered input files");
    Ok(files)
}
