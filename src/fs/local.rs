//! File tree on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use super::{FileTree, is_hidden};

/// A project directory on disk.
#[derive(Debug, Clone)]
pub struct LocalFileTree {
    root: PathBuf,
}

impl LocalFileTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

impl FileTree for LocalFileTree {
    fn list_file_paths(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let abs = self.root.join(dir);
        if !abs.is_dir() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&abs).skip_hidden(true).sort(true) {
            let entry = entry.map_err(io::Error::other)?;
            if entry.file_type().is_file() {
                paths.push(self.relative(&entry.path()));
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn list_dirs(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let abs = self.root.join(dir);
        if !abs.is_dir() {
            return Ok(Vec::new());
        }

        let mut dirs = Vec::new();
        for entry in fs::read_dir(&abs)? {
            let entry = entry?;
            let rel = self.relative(&entry.path());
            if entry.file_type()?.is_dir() && !is_hidden(&rel) {
                dirs.push(rel);
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    fn read_text(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(self.root.join(path))
    }

    fn exists(&self, path: &Path) -> bool {
        self.root.join(path).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::SiteId;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_list_skips_hidden_and_sorts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "contents/b.md", "b");
        write(dir.path(), "contents/a/x.md", "x");
        write(dir.path(), "contents/.draft.md", "hidden");
        write(dir.path(), "contents/.git/config", "hidden");

        let tree = LocalFileTree::new(dir.path());
        let files = tree.list_file_paths(Path::new("contents")).unwrap();
        assert_eq!(
            files,
            [
                PathBuf::from("contents/a/x.md"),
                PathBuf::from("contents/b.md")
            ]
        );
        assert_eq!(tree.read_text(&files[1]).unwrap(), "b");
        assert!(tree.exists(Path::new("contents/a")));
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let tree = LocalFileTree::new(dir.path());
        assert!(tree.list_file_paths(Path::new("nope")).unwrap().is_empty());
        assert!(tree.read_text(Path::new("nope.md")).is_err());
    }

    #[test]
    fn test_discover_site_ids() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "sites/blog/synamic.toml", "");
        write(dir.path(), "sites/blog/sites/fr/synamic.toml", "");
        write(dir.path(), "sites/docs/contents/a.md", "");
        write(dir.path(), "sites/.cache/x", "");

        let tree = LocalFileTree::new(dir.path());
        let ids: Vec<String> = tree
            .discover_site_ids("sites")
            .unwrap()
            .iter()
            .map(SiteId::to_string)
            .collect();
        assert_eq!(ids, ["blog", "blog::fr", "docs"]);
    }
}
