//! Resolve command: router lookup of one URL.

use std::path::Path;

use anyhow::{Context, Result, bail};

use super::common::open_cache;

/// Load every site and print the content `url` points to.
///
/// Prints `site: path`, plus the page position for pagination URLs.
pub fn resolve_url(root: &Path, url: &str) -> Result<()> {
    let mut cache = open_cache(root)?;
    cache.load_all().context("failed to load sites")?;

    let Some(resolved) = cache.resolve_request(url)? else {
        bail!("no content found for `{url}`");
    };
    let content = &resolved.content;
    match resolved.page()? {
        Some(page) if !resolved.special.is_empty() => println!(
            "{}: {} (page {} of {})",
            resolved.site,
            content.path(),
            page.position,
            page.total
        ),
        _ => println!("{}: {}", resolved.site, content.path()),
    }
    Ok(())
}
