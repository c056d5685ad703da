//! Helpers shared by the commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use crate::cache::ObjectCache;
use crate::config::{SETTINGS_FILE_NAME, find_settings_file};
use crate::debug;
use crate::fs::LocalFileTree;
use crate::site::SiteId;

/// Open the project at `root` without loading any site.
pub fn open_cache(root: &Path) -> Result<ObjectCache> {
    if !root.is_dir() {
        bail!("project root `{}` is not a directory", root.display());
    }
    let root = project_root(root);
    debug!("cache"; "project root {}", root.display());
    ObjectCache::open(Arc::new(LocalFileTree::new(&root)))
        .with_context(|| format!("cannot open project at `{}`", root.display()))
}

/// Directory of the nearest `synamic.toml` at or above `start`, or `start`
/// itself when there is none.
fn project_root(start: &Path) -> PathBuf {
    find_settings_file(start, SETTINGS_FILE_NAME)
        .and_then(|file| file.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| start.to_path_buf())
}

/// Open the project and load one site.
pub fn load_site(root: &Path, site: &SiteId) -> Result<ObjectCache> {
    let mut cache = open_cache(root)?;
    cache
        .load(site)
        .with_context(|| format!("failed to load site `{site}`"))?;
    Ok(cache)
}

/// Print `value` as JSON on stdout.
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let formatted = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{formatted}");
    Ok(())
}
