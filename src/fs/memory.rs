//! In-memory file tree.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Component, Path, PathBuf};

use super::{FileTree, is_hidden};

/// Files kept in an ordered map, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileTree {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryFileTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, text: impl Into<String>) {
        self.files.insert(clean(path.as_ref()), text.into());
    }

    pub fn remove(&mut self, path: impl AsRef<Path>) -> Option<String> {
        self.files.remove(&clean(path.as_ref()))
    }
}

/// Drop `.` components so `./a` and `a` are the same key.
fn clean(path: &Path) -> PathBuf {
    path.components()
        .filter(|comp| !matches!(comp, Component::CurDir))
        .collect()
}

impl FileTree for MemoryFileTree {
    fn list_file_paths(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let dir = clean(dir);
        Ok(self
            .files
            .keys()
            .filter(|path| path.starts_with(&dir))
            .filter(|path| !is_hidden(path.strip_prefix(&dir).unwrap_or(path)))
            .cloned()
            .collect())
    }

    fn list_dirs(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let dir = clean(dir);
        let dirs: BTreeSet<PathBuf> = self
            .files
            .keys()
            .filter_map(|path| {
                let rest = path.strip_prefix(&dir).ok()?;
                let mut comps = rest.components();
                let first = comps.next()?;
                // Files directly in `dir` are not directories
                comps.next()?;
                let child = dir.join(first);
                (!is_hidden(Path::new(first.as_os_str()))).then_some(child)
            })
            .collect();
        Ok(dirs.into_iter().collect())
    }

    fn read_text(&self, path: &Path) -> io::Result<String> {
        self.files.get(&clean(path)).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("`{}` not found", path.display()),
            )
        })
    }

    fn exists(&self, path: &Path) -> bool {
        let path = clean(path);
        self.files.contains_key(&path) || self.files.keys().any(|key| key.starts_with(&path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> MemoryFileTree {
        MemoryFileTree::new()
            .with_file("contents/b.md", "b")
            .with_file("contents/a/x.md", "x")
            .with_file("contents/.hidden.md", "")
            .with_file("sites/blog/sites/fr/contents/y.md", "y")
            .with_file("sites/docs/synamic.toml", "")
    }

    #[test]
    fn test_list_file_paths() {
        let files = tree().list_file_paths(Path::new("contents")).unwrap();
        assert_eq!(
            files,
            [
                PathBuf::from("contents/a/x.md"),
                PathBuf::from("contents/b.md")
            ]
        );
    }

    #[test]
    fn test_list_dirs() {
        let dirs = tree().list_dirs(Path::new("sites")).unwrap();
        assert_eq!(dirs, [PathBuf::from("sites/blog"), PathBuf::from("sites/docs")]);
        let dirs = tree().list_dirs(Path::new("contents")).unwrap();
        assert_eq!(dirs, [PathBuf::from("contents/a")]);
    }

    #[test]
    fn test_read_and_exists() {
        let tree = tree();
        assert_eq!(tree.read_text(Path::new("./contents/b.md")).unwrap(), "b");
        assert!(tree.exists(Path::new("contents/a")));
        assert!(!tree.exists(Path::new("contents/z.md")));
        assert_eq!(
            tree.read_text(Path::new("missing")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_discover_site_ids() {
        let ids: Vec<String> = tree()
            .discover_site_ids("sites")
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(ids, ["blog", "blog::fr", "docs"]);
    }

    #[test]
    fn test_create_path() {
        assert_eq!(
            tree().create_path(&["contents", "a", "x.md"]),
            PathBuf::from("contents/a/x.md")
        );
    }
}
