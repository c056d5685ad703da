//! Directory-level field overrides.
//!
//! Every directory under the contents root may hold a meta file
//! (`_meta.toml`) whose fields apply to all contents below it:
//!
//! ```text
//! contents/_meta.toml              a = 1, type = "page"
//! contents/posts/_meta.toml        a = 2, type = "post"
//! contents/posts/hello.md          a = 3           -> a = 3, type = "post"
//! ```
//!
//! Layers merge nearest-root-first, the file's own front matter last.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::frontmatter::parse_toml_fields;
use super::{ContentError, RawFields};
use crate::fs::FileTree;

/// Builds layered raw fields, reading each meta file at most once.
pub struct DirectoryLayers<'a> {
    tree: &'a dyn FileTree,
    contents_dir: PathBuf,
    meta_file_name: String,
    cache: FxHashMap<PathBuf, Option<Arc<RawFields>>>,
}

impl<'a> DirectoryLayers<'a> {
    pub fn new(tree: &'a dyn FileTree, contents_dir: impl Into<PathBuf>, meta_file_name: &str) -> Self {
        Self {
            tree,
            contents_dir: contents_dir.into(),
            meta_file_name: meta_file_name.to_string(),
            cache: FxHashMap::default(),
        }
    }

    /// Whether `path` is a meta file rather than content.
    pub fn is_meta_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == self.meta_file_name)
    }

    /// Merge the directory layers above `file` with its front matter.
    pub fn fields_for(&mut self, file: &Path, front_matter: RawFields) -> Result<RawFields, ContentError> {
        let mut merged = RawFields::new();
        for dir in self.ancestors(file) {
            if let Some(layer) = self.layer(&dir)? {
                merged.extend(layer.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        merged.extend(front_matter);
        Ok(merged)
    }

    /// Contents root first, down to the file's own directory.
    fn ancestors(&self, file: &Path) -> Vec<PathBuf> {
        let parent = file.parent().unwrap_or(Path::new(""));
        let rel = parent.strip_prefix(&self.contents_dir).unwrap_or(Path::new(""));

        let mut dirs = vec![self.contents_dir.clone()];
        let mut current = self.contents_dir.clone();
        for comp in rel.components() {
            current.push(comp);
            dirs.push(current.clone());
        }
        dirs
    }

    fn layer(&mut self, dir: &Path) -> Result<Option<Arc<RawFields>>, ContentError> {
        if let Some(cached) = self.cache.get(dir) {
            return Ok(cached.clone());
        }

        let meta_path = dir.join(&self.meta_file_name);
        let layer = if self.tree.exists(&meta_path) {
            let meta_display = meta_path.display().to_string();
            let text = self
                .tree
                .read_text(&meta_path)
                .map_err(|err| ContentError::FrontMatter {
                    path: meta_display.clone(),
                    message: err.to_string(),
                })?;
            let fields = parse_toml_fields(&text).map_err(|message| ContentError::FrontMatter {
                path: meta_display,
                message,
            })?;
            Some(Arc::new(fields))
        } else {
            None
        };

        self.cache.insert(dir.to_path_buf(), layer.clone());
        Ok(layer)
    }
}
