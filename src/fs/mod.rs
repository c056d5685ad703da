//! File access behind a small trait.
//!
//! The cache never touches the disk directly: it lists, reads and probes
//! paths through a [`FileTree`] rooted at the project directory. All paths
//! given to and returned from a tree are relative to its root.
//!
//! - [`LocalFileTree`]: a directory on disk, walked with `jwalk`
//! - [`MemoryFileTree`]: an in-memory map, for tests and generated trees

mod local;
mod memory;

pub use local::LocalFileTree;
pub use memory::MemoryFileTree;

use std::io;
use std::path::{Path, PathBuf};

use crate::site::{SiteError, SiteId};

pub trait FileTree: Send + Sync {
    /// All files below `dir`, recursively and sorted. Hidden entries are
    /// skipped and a missing directory lists as empty.
    fn list_file_paths(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Direct subdirectories of `dir`, sorted.
    fn list_dirs(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    fn read_text(&self, path: &Path) -> io::Result<String>;

    fn exists(&self, path: &Path) -> bool;

    fn create_path(&self, components: &[&str]) -> PathBuf {
        components.iter().collect()
    }

    /// Collect the ids of all nested sites (`sites/a/sites/b` -> `a::b`).
    ///
    /// Only gathers ids; parent-before-child validation happens when the
    /// ids are registered.
    fn discover_site_ids(&self, subsites_dir: &str) -> Result<Vec<SiteId>, SiteError> {
        let mut found = Vec::new();
        let mut pending = vec![SiteId::root()];

        while let Some(parent) = pending.pop() {
            let parent_root: PathBuf = parent
                .components()
                .iter()
                .flat_map(|comp| [subsites_dir, comp.as_str()])
                .collect();
            // Unreadable directories have no sites
            let dirs = self
                .list_dirs(&parent_root.join(subsites_dir))
                .unwrap_or_default();
            for dir in dirs {
                let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let child = parent.child(name)?;
                pending.push(child.clone());
                found.push(child);
            }
        }

        found.sort();
        Ok(found)
    }
}

/// Whether a path has a hidden (dot-prefixed) component.
pub(crate) fn is_hidden(path: &Path) -> bool {
    path.components().any(|comp| {
        comp.as_os_str()
            .to_str()
            .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
    })
}
