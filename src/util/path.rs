//! Path helpers

use std::path::{Path, PathBuf};

/// Expand `~`, `$VAR` and `${VAR}` in a string.
///
/// Unknown variables leave the input unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(expand_env_vars(path.to_string_lossy().as_ref()))
}
