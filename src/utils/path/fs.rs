//! Filesystem path utilities.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Join a public (URL-style) path under a filesystem root.
///
/// Leading slashes are stripped so the result always stays under `root`.
///
/// # Example
/// ```ignore
/// join_file(Path::new("/site/public"), "/css/main.css") // /site/public/css/main.css
/// ```
pub fn join_file(root: &Path, public: &str) -> PathBuf {
    public
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .fold(root.to_path_buf(), |acc, segment| acc.join(segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_relative() {
        let normalized = normalize_path(Path::new("relative/path/file.txt"));
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_join_file() {
        let root = Path::new("/site/public");
        assert_eq!(
            join_file(root, "/css/main.css"),
            PathBuf::from("/site/public/css/main.css")
        );
        assert_eq!(join_file(root, "js//app.js"), PathBuf::from("/site/public/js/app.js"));
        assert_eq!(join_file(root, ""), PathBuf::from("/site/public"));
    }
}
