//! Site registry - an arena of sites indexed by id.

use std::path::PathBuf;

use rustc_hash::FxHashMap;

use super::{SiteError, SiteId};

/// A registered site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub id: SiteId,
    /// Site root relative to the project root (`sites/blog/sites/fr`).
    pub root: PathBuf,
}

/// Flat registry of all sites of a project.
///
/// The root site always exists. Every other site can only be added once its
/// parent is registered, which keeps the registry a valid tree without
/// storing parent/child pointers.
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    /// Insertion order (parents before children).
    order: Vec<SiteId>,
    sites: FxHashMap<SiteId, Site>,
    /// Directory name holding sub-sites (`sites`).
    subsites_dir: String,
}

impl SiteRegistry {
    /// Create a registry holding only the root site.
    pub fn new(subsites_dir: impl Into<String>) -> Self {
        let root = Site {
            id: SiteId::root(),
            root: PathBuf::new(),
        };
        let mut sites = FxHashMap::default();
        sites.insert(SiteId::root(), root);
        Self {
            order: vec![SiteId::root()],
            sites,
            subsites_dir: subsites_dir.into(),
        }
    }

    /// Build a registry from discovered site ids.
    ///
    /// Ids are ordered by depth first so that every parent is inserted before
    /// its children; a child whose parent was never discovered is rejected.
    pub fn from_discovered<I>(subsites_dir: impl Into<String>, discovered: I) -> Result<Self, SiteError>
    where
        I: IntoIterator<Item = SiteId>,
    {
        let mut registry = Self::new(subsites_dir);
        let mut ids: Vec<SiteId> = discovered.into_iter().filter(|id| !id.is_root()).collect();
        ids.sort_by_key(SiteId::len);
        for id in ids {
            registry.add(id)?;
        }
        Ok(registry)
    }

    /// Register a site. Its parent must already be registered.
    pub fn add(&mut self, id: SiteId) -> Result<&Site, SiteError> {
        if self.sites.contains_key(&id) {
            return Err(SiteError::DuplicateSite(id));
        }
        let parent = id.parent_id().unwrap_or_default();
        if !self.sites.contains_key(&parent) {
            return Err(SiteError::ParentMissing { child: id, parent });
        }

        let site = Site {
            root: self.site_root_path(&id),
            id: id.clone(),
        };
        self.order.push(id.clone());
        Ok(self.sites.entry(id).or_insert(site))
    }

    pub fn get(&self, id: &SiteId) -> Result<&Site, SiteError> {
        self.sites
            .get(id)
            .ok_or_else(|| SiteError::SiteNotFound(id.clone()))
    }

    #[inline]
    pub fn contains(&self, id: &SiteId) -> bool {
        self.sites.contains_key(id)
    }

    /// All site ids in insertion order (parents before children).
    #[inline]
    pub fn ids(&self) -> &[SiteId] {
        &self.order
    }

    /// Sites in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Site> {
        self.order.iter().filter_map(|id| self.sites.get(id))
    }

    /// Direct children of a site.
    pub fn children(&self, id: &SiteId) -> Vec<&SiteId> {
        self.order
            .iter()
            .filter(|child| child.parent_id().as_ref() == Some(id))
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Real directory of a site: `a::b` lives in `sites/a/sites/b`.
    pub fn site_root_path(&self, id: &SiteId) -> PathBuf {
        id.components()
            .iter()
            .flat_map(|comp| [self.subsites_dir.as_str(), comp.as_str()])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> SiteId {
        SiteId::parse(raw).unwrap()
    }

    #[test]
    fn test_new_has_root() {
        let registry = SiteRegistry::new("sites");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&SiteId::root()).unwrap().root, PathBuf::new());
    }

    #[test]
    fn test_add_requires_parent() {
        let mut registry = SiteRegistry::new("sites");
        let err = registry.add(id("blog::fr")).unwrap_err();
        assert_eq!(
            err,
            SiteError::ParentMissing {
                child: id("blog::fr"),
                parent: id("blog"),
            }
        );

        registry.add(id("blog")).unwrap();
        let fr = registry.add(id("blog::fr")).unwrap();
        assert_eq!(fr.root, PathBuf::from("sites/blog/sites/fr"));
    }

    #[test]
    fn test_add_duplicate() {
        let mut registry = SiteRegistry::new("sites");
        registry.add(id("blog")).unwrap();
        assert_eq!(
            registry.add(id("blog")).unwrap_err(),
            SiteError::DuplicateSite(id("blog"))
        );
    }

    #[test]
    fn test_from_discovered_orders_parents_first() {
        let registry = SiteRegistry::from_discovered(
            "sites",
            vec![id("docs::v2::api"), id("docs"), id("docs::v2"), id("blog")],
        )
        .unwrap();

        let order: Vec<String> = registry.ids().iter().map(ToString::to_string).collect();
        assert_eq!(order, ["::", "docs", "blog", "docs::v2", "docs::v2::api"]);
        assert_eq!(registry.children(&id("docs")), vec![&id("docs::v2")]);
    }

    #[test]
    fn test_from_discovered_orphan_rejected() {
        let err = SiteRegistry::from_discovered("sites", vec![id("a::b")]).unwrap_err();
        assert!(matches!(err, SiteError::ParentMissing { .. }));
    }

    #[test]
    fn test_get_missing() {
        let registry = SiteRegistry::new("sites");
        assert_eq!(
            registry.get(&id("nope")).unwrap_err(),
            SiteError::SiteNotFound(id("nope"))
        );
    }
}
