//! File utility functions

use std::path::{Path, PathBuf};

/// Expand a path string to an absolute path.
///
/// `~` and `~/rest` resolve against the home directory; relative paths
/// resolve against the current directory; absolute paths pass through.
///
/// ```text
/// expand_path("~/.gazetteer") // -> /home/user/.gazetteer
/// expand_path("./db")         // -> /current/dir/db
/// expand_path("/srv/db")      // -> /srv/db
/// ```
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    let expanded = match path {
        "" => PathBuf::from("."),
        "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        _ => match (path.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(path),
        },
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

/// Size in bytes of a regular file, or `None` when `path` is not one
pub fn file_size(path: &Path) -> Option<u64> {
    std::fs::metadata(path)
        .ok()
        .filter(|m| m.is_file())
        .map(|m| m.len())
}
