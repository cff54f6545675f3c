//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from the current directory.
///
/// ```text
/// /home/user/work/site/docs/  ← cwd
/// /home/user/work/rawpeek.toml ← found
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_file_from(&cwd, config_name)
}

/// Same as [`find_config_file`], starting from `start`.
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
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("rawpeek.toml"), "").unwrap();

        let found = find_config_file_from(&nested, Path::new("rawpeek.toml"));
        assert_eq!(found, Some(dir.path().join("rawpeek.toml")));
    }

    #[test]
    fn test_absolute_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        assert_eq!(find_config_file_from(dir.path(), &path), None);

        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file_from(dir.path(), &path), Some(path));
    }

    #[test]
    fn test_directory_is_not_a_config() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("rawpeek.toml")).unwrap();
        let nested = dir.path().join("x");
        fs::create_dir(&nested).unwrap();
        // The directory named like the config is skipped; search continues upward.
        let found = find_config_file_from(&nested, Path::new("rawpeek.toml"));
        assert_ne!(found, Some(dir.path().join("rawpeek.toml")));
    }
}
