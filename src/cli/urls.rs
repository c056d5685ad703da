//! Urls command: the URL index of one site.

use std::path::Path;

use anyhow::Result;

use super::common::load_site;
use crate::site::SiteId;

/// Print `url -> path` lines, sorted by URL.
pub fn print_urls(root: &Path, site: &SiteId) -> Result<()> {
    let cache = load_site(root, site)?;
    for (url, path) in cache.url_index(site)? {
        println!("{url} -> {path}");
    }
    Ok(())
}
