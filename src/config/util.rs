//! Configuration file discovery.

use std::path::{Path, PathBuf};

/// Find `config_name` by walking upward from the current directory.
///
/// # Example
/// ```text
/// /home/user/site/assets/css/  ← cwd
/// /home/user/site/kiln.toml    ← found
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_file_from(&cwd, config_name)
}

/// Same as [`find_config_file`], starting at `start`.
///
/// An absolute `config_name` is returned as-is when it exists.
pub fn find_config_file_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_in_parent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("assets/css");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("kiln.toml"), "").unwrap();

        let found = find_config_file_from(&nested, Path::new("kiln.toml")).unwrap();
        assert_eq!(found, dir.path().join("kiln.toml"));
    }

    #[test]
    fn test_absolute_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(find_config_file_from(dir.path(), &missing).is_none());
    }
}
