//! Per-site object cache.
//!
//! # Module Structure
//!
//! ```text
//! cache/
//! ├── contents.rs    # SiteContents: indexes of one loaded site
//! ├── error.rs       # CacheError
//! ├── loader.rs      # building SiteContents from a FileTree
//! ├── statics.rs     # StaticSink for non-markdown files
//! └── mod.rs         # ObjectCache (this file)
//! ```
//!
//! # Lifecycle
//!
//! ```text
//!           load              done
//! Empty ──────────▶ Loading ───────▶ Loaded
//!                      │  ▲             │
//!               error  │  └─────────────┘ reload
//!                      ▼
//!                   Failed ──▶ load / reload
//! ```
//!
//! Every site is loaded on its own. A load builds a fresh [`SiteContents`]
//! and swaps it in, so a reload never touches sibling sites and readers of
//! the previous load keep a consistent (stale) view.

mod contents;
mod error;
mod loader;
mod statics;

pub use contents::SiteContents;
pub use error::CacheError;
pub use statics::{StaticCollector, StaticSink};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::address::{ContentUrl, DocumentKind, PathAddress, RequestParser, UrlScope};
use crate::config::{SETTINGS_FILE_NAME, SiteSettings};
use crate::content::{
    ContentError, ContentFields, Marker, MarkerKind, MarkerRegistry, ModelRegistry,
    PaginationPage,
};
use crate::fs::FileTree;
use crate::query::Query;
use crate::site::{SiteError, SiteId, SiteRegistry};
use crate::utils::plural_count;
use crate::{debug, log};
use loader::{Loader, Registries};

/// Load state of one site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    #[default]
    Empty,
    Loading,
    Loaded,
    /// Stopped on an error. Contents indexed before the error stay readable.
    Failed,
}

#[derive(Default)]
struct SiteCache {
    state: LoadState,
    contents: Option<Arc<SiteContents>>,
    registries: Registries,
}

impl SiteCache {
    fn load(&mut self, loader: &Loader, site: &SiteId) -> Result<(), CacheError> {
        self.state = LoadState::Loading;
        self.contents = None;

        let outcome = loader.load_site(site, &self.registries);
        self.contents = outcome.contents;
        match outcome.error {
            None => {
                self.state = LoadState::Loaded;
                Ok(())
            }
            Some(err) => {
                self.state = LoadState::Failed;
                Err(err)
            }
        }
    }
}

/// A router lookup that found a content.
#[derive(Debug, Clone)]
pub struct ResolvedRequest {
    pub site: SiteId,
    pub content: Arc<ContentFields>,
    /// Components after the partition component (`/posts/_/2/` -> `["2"]`).
    pub special: Vec<String>,
}

impl ResolvedRequest {
    /// The pagination page addressed by the special components.
    ///
    /// No special components means the first page. `None` when the content
    /// is not paginated or the page does not exist.
    pub fn page(&self) -> Result<Option<Arc<PaginationPage>>, ContentError> {
        let Some(paginated) = self.content.pagination()? else {
            return Ok(None);
        };
        let position = match self.special.first() {
            None => 1,
            Some(segment) => match segment.parse::<usize>() {
                Ok(position) => position,
                Err(_) => return Ok(None),
            },
        };
        Ok(paginated.page(position).cloned())
    }
}

/// Contents, markers and URLs of every site of a project.
pub struct ObjectCache {
    loader: Loader,
    sites: FxHashMap<SiteId, SiteCache>,
}

impl ObjectCache {
    /// Cache over `registry`'s sites, every site `Empty`.
    pub fn new(tree: Arc<dyn FileTree>, registry: SiteRegistry, root_settings: SiteSettings) -> Self {
        let sites = registry
            .ids()
            .iter()
            .map(|id| (id.clone(), SiteCache::default()))
            .collect();
        Self {
            loader: Loader::new(tree, registry, root_settings),
            sites,
        }
    }

    /// Read the root settings and discover sub-sites from `tree`.
    pub fn open(tree: Arc<dyn FileTree>) -> Result<Self, CacheError> {
        let settings_path = Path::new(SETTINGS_FILE_NAME);
        let settings = if tree.exists(settings_path) {
            let text = tree
                .read_text(settings_path)
                .map_err(|err| CacheError::io(settings_path, err))?;
            SiteSettings::from_toml_str(&text)?
        } else {
            debug!("cache"; "no {}, using default settings", SETTINGS_FILE_NAME);
            SiteSettings::default()
        };

        let subsites = settings.dirs.subsites.clone();
        let discovered = tree.discover_site_ids(&subsites)?;
        let registry = SiteRegistry::from_discovered(subsites, discovered)?;
        debug!("cache"; "found {}", plural_count(registry.len(), "site"));
        Ok(Self::new(tree, registry, settings))
    }

    /// Forward non-markdown content files to `sink` during loads.
    pub fn with_static_sink(mut self, sink: Arc<dyn StaticSink>) -> Self {
        self.loader.statics = Some(sink);
        self
    }

    /// Use `models` instead of the site's models directory. Takes effect on
    /// the next load.
    pub fn set_model_registry(&mut self, site: &SiteId, models: Arc<dyn ModelRegistry>) -> Result<(), CacheError> {
        self.entry_mut(site)?.registries.models = Some(models);
        Ok(())
    }

    /// Use `markers` instead of the site's `[markers]` settings. Takes effect
    /// on the next load.
    pub fn set_marker_registry(&mut self, site: &SiteId, markers: Arc<dyn MarkerRegistry>) -> Result<(), CacheError> {
        self.entry_mut(site)?.registries.markers = Some(markers);
        Ok(())
    }

    fn entry(&self, site: &SiteId) -> Result<&SiteCache, CacheError> {
        self.sites
            .get(site)
            .ok_or_else(|| SiteError::SiteNotFound(site.clone()).into())
    }

    fn entry_mut(&mut self, site: &SiteId) -> Result<&mut SiteCache, CacheError> {
        self.sites
            .get_mut(site)
            .ok_or_else(|| SiteError::SiteNotFound(site.clone()).into())
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Load a site that is `Empty` or `Failed`.
    pub fn load(&mut self, site: &SiteId) -> Result<(), CacheError> {
        let entry = self
            .sites
            .get_mut(site)
            .ok_or_else(|| SiteError::SiteNotFound(site.clone()))?;
        if matches!(entry.state, LoadState::Loaded | LoadState::Loading) {
            return Err(CacheError::AlreadyLoaded(site.clone()));
        }
        entry.load(&self.loader, site)
    }

    /// Drop a site's contents and load it again.
    pub fn reload(&mut self, site: &SiteId) -> Result<(), CacheError> {
        let entry = self
            .sites
            .get_mut(site)
            .ok_or_else(|| SiteError::SiteNotFound(site.clone()))?;
        match entry.state {
            LoadState::Empty => return Err(CacheError::NotLoaded(site.clone())),
            LoadState::Loading => return Err(CacheError::AlreadyLoaded(site.clone())),
            LoadState::Loaded | LoadState::Failed => {}
        }
        debug!("cache"; "reloading site {}", site);
        entry.load(&self.loader, site)
    }

    /// Load every site not loaded yet, one site per rayon task.
    ///
    /// All sites are attempted; the first error (in site order) is returned.
    pub fn load_all(&mut self) -> Result<(), CacheError> {
        let loader = &self.loader;
        let mut failures: Vec<(SiteId, CacheError)> = self
            .sites
            .par_iter_mut()
            .filter(|(_, entry)| matches!(entry.state, LoadState::Empty | LoadState::Failed))
            .filter_map(|(site, entry)| {
                entry
                    .load(loader, site)
                    .err()
                    .map(|err| (site.clone(), err))
            })
            .collect();

        failures.sort_by(|a, b| a.0.cmp(&b.0));
        for (site, err) in &failures {
            log!("error"; "site {}: {}", site, err);
        }
        match failures.into_iter().next() {
            Some((_, err)) => Err(err),
            None => Ok(()),
        }
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn sites(&self) -> &[SiteId] {
        self.loader.registry.ids()
    }

    pub fn registry(&self) -> &SiteRegistry {
        &self.loader.registry
    }

    pub fn state(&self, site: &SiteId) -> Result<LoadState, CacheError> {
        Ok(self.entry(site)?.state)
    }

    /// Indexes of the last load, complete or not.
    pub fn site_contents(&self, site: &SiteId) -> Result<&Arc<SiteContents>, CacheError> {
        self.entry(site)?
            .contents
            .as_ref()
            .ok_or_else(|| CacheError::NotLoaded(site.clone()))
    }

    /// Settings of a site, parsed on first access.
    pub fn get_site_settings(&self, site: &SiteId) -> Result<Arc<SiteSettings>, CacheError> {
        self.loader.site_settings(site)
    }

    /// Content by its path relative to the contents directory.
    pub fn get_content_meta(&self, site: &SiteId, path: &str) -> Result<Option<Arc<ContentFields>>, CacheError> {
        Ok(self.site_contents(site)?.get(path).cloned())
    }

    pub fn get_content_by_id(&self, site: &SiteId, id: &str) -> Result<Option<Arc<ContentFields>>, CacheError> {
        Ok(self.site_contents(site)?.get_by_id(id).cloned())
    }

    /// Content whose permalink is `url`. Unknown or unloaded sites find nothing.
    pub fn get_content_by_url(&self, url: &ContentUrl) -> Option<Arc<ContentFields>> {
        self.sites
            .get(url.site())?
            .contents
            .as_ref()?
            .get_by_url(url)
            .cloned()
    }

    pub fn get_marker(&self, site: &SiteId, id: &str) -> Result<&Marker, CacheError> {
        self.site_contents(site)?
            .markers
            .get(id)
            .ok_or_else(|| CacheError::MarkerNotFound(id.to_string()))
    }

    pub fn get_markers(&self, site: &SiteId, kind: MarkerKind) -> Result<Vec<&Marker>, CacheError> {
        Ok(self
            .site_contents(site)?
            .markers()
            .filter(|marker| marker.kind == kind)
            .collect())
    }

    /// [`get_markers`](Self::get_markers) with the kind given by name.
    pub fn get_markers_by_kind_name(&self, site: &SiteId, kind: &str) -> Result<Vec<&Marker>, CacheError> {
        let kind = MarkerKind::parse(kind).ok_or_else(|| CacheError::UnknownMarkerKind(kind.to_string()))?;
        self.get_markers(site, kind)
    }

    /// Filter a site's contents with a query.
    pub fn query(&self, site: &SiteId, text: &str) -> Result<Vec<Arc<ContentFields>>, CacheError> {
        let query = Query::parse(text).map_err(ContentError::from)?;
        let contents = self.site_contents(site)?;
        Ok(query.filter(contents.contents())?)
    }

    /// Non-markdown files found under a site's contents directory.
    pub fn static_paths(&self, site: &SiteId) -> Result<&[PathBuf], CacheError> {
        Ok(self.site_contents(site)?.statics())
    }

    /// URL index of a site, sorted by URL.
    pub fn url_index(&self, site: &SiteId) -> Result<Vec<(&ContentUrl, &str)>, CacheError> {
        Ok(self.site_contents(site)?.urls())
    }

    /// Find the content a requested URL points to.
    ///
    /// The request is split with the root site's host base path and
    /// partition component. A local path without a trailing slash is retried
    /// as an HTML URL, so `/posts/hello` finds `/posts/hello/`.
    pub fn resolve_request(&self, raw: &str) -> Result<Option<ResolvedRequest>, CacheError> {
        let root = self.loader.root_settings();
        let parser = RequestParser::new(
            PathAddress::parse(&root.host_base_path)?,
            self.sites().iter().cloned(),
            root.url_partition_comp.clone(),
        );
        let target = parser.parse(raw)?;

        let settings = self.get_site_settings(&target.site)?;
        let scope = UrlScope::from_settings(&settings, target.site.clone())?;
        let url = ContentUrl::new(scope, target.local, DocumentKind::Unspecified);

        let content = self
            .get_content_by_url(&url)
            .or_else(|| self.get_content_by_url(&url.clone_with_kind(DocumentKind::HtmlDocument)));
        debug!(
            "router";
            "{} -> {}",
            raw,
            content.as_ref().map_or("nothing", |content| content.path())
        );

        Ok(content.map(|content| ResolvedRequest {
            site: target.site,
            content,
            special: target.special,
        }))
    }
}
