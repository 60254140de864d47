//! Locating the repository root from any path inside it

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Directory (or worktree pointer file) marking a repository root
const REPO_MARKER: &str = ".git";

/// Walk up from `start` to the nearest directory containing `.git`
///
/// The result is absolute. Fails with [`Error::NotARepository`] when the
/// walk reaches the filesystem root without finding a marker.
pub fn find_repository_root(start: &Path) -> Result<PathBuf> {
    let start = std::fs::canonicalize(start).map_err(|_| Error::NotARepository(start.to_path_buf()))?;

    start
        .ancestors()
        .find(|dir| dir.join(REPO_MARKER).exists())
        .map(Path::to_path_buf)
        .ok_or(Error::NotARepository(start))
}
