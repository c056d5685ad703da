//! Receivers of non-markdown files found under a contents directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::site::SiteId;

/// Takes the static files the cache does not index.
pub trait StaticSink: Send + Sync {
    fn forward(&self, site: &SiteId, path: &Path);
}

/// Sink that remembers forwarded paths per site.
#[derive(Debug, Default)]
pub struct StaticCollector {
    paths: Mutex<BTreeMap<SiteId, Vec<PathBuf>>>,
}

impl StaticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self, site: &SiteId) -> Vec<PathBuf> {
        self.paths.lock().get(site).cloned().unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.paths.lock().values().map(Vec::len).sum()
    }
}

impl StaticSink for StaticCollector {
    fn forward(&self, site: &SiteId, path: &Path) {
        self.paths
            .lock()
            .entry(site.clone())
            .or_default()
            .push(path.to_path_buf());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_groups_by_site() {
        let collector = StaticCollector::new();
        let blog = SiteId::parse("blog").unwrap();
        collector.forward(&SiteId::root(), Path::new("contents/logo.png"));
        collector.forward(&blog, Path::new("sites/blog/contents/a.css"));
        collector.forward(&blog, Path::new("sites/blog/contents/b.css"));

        assert_eq!(collector.paths(&blog).len(), 2);
        assert_eq!(collector.paths(&SiteId::root()), [PathBuf::from("contents/logo.png")]);
        assert_eq!(collector.total(), 3);
    }
}
