//! Settings file lookup.

use std::path::{Path, PathBuf};

/// Find the settings file by walking up from `start`.
///
/// ```text
/// /home/user/site/contents/posts/  <- start
/// /home/user/site/synamic.toml     <- found
/// ```
pub fn find_settings_file(start: &Path, file_name: &str) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(file_name);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_settings_file_upward() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("contents/posts");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("synamic.toml"), "").unwrap();

        let found = find_settings_file(&nested, "synamic.toml").unwrap();
        assert_eq!(found, dir.path().join("synamic.toml"));
    }

    #[test]
    fn test_find_settings_file_missing() {
        let dir = TempDir::new().unwrap();
        assert!(find_settings_file(dir.path(), "no-such-settings-file.toml").is_none());
    }
}
