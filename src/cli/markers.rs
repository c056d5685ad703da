//! Markers command: markers of one kind with their marks, as JSON.

use std::path::Path;

use anyhow::Result;

use super::common::{load_site, print_json};
use crate::site::SiteId;

pub fn print_markers(root: &Path, kind: &str, site: &SiteId) -> Result<()> {
    let cache = load_site(root, site)?;
    let markers = cache.get_markers_by_kind_name(site, kind)?;
    print_json(&markers, true)
}
