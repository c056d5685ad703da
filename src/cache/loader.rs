//! Building the contents of one site.
//!
//! Load order matters: markers first so that marks found in contents have
//! a marker to land in, then content metas, then the URL index derived from
//! them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::contents::{SiteContents, SiteResolver};
use super::{CacheError, StaticSink};
use crate::address::{ContentUrl, DocumentKind, UrlScope};
use crate::config::{Backend, SETTINGS_FILE_NAME, SiteSettings};
use crate::content::{
    CONTENT_MODEL, ContentFields, DirectoryLayers, Fields, MarkerRegistry,
    ModelRegistry, SettingsMarkerRegistry, TreeModelRegistry, Value, derive_permalink,
    is_markdown, split_front_matter,
};
use crate::debug;
use crate::fs::FileTree;
use crate::site::{SiteId, SiteRegistry};
use crate::utils::{plural_count, plural_s};

/// Shared, read-only state every site load needs.
pub(super) struct Loader {
    pub(super) tree: Arc<dyn FileTree>,
    pub(super) registry: SiteRegistry,
    root_settings: Arc<SiteSettings>,
    /// Settings per site, filled on first access.
    settings: RwLock<FxHashMap<SiteId, Arc<SiteSettings>>>,
    pub(super) statics: Option<Arc<dyn StaticSink>>,
}

/// Registries a caller injected for one site.
#[derive(Clone, Default)]
pub(super) struct Registries {
    pub(super) models: Option<Arc<dyn ModelRegistry>>,
    pub(super) markers: Option<Arc<dyn MarkerRegistry>>,
}

/// Result of one load. Contents are kept even when loading stopped early,
/// so everything inserted before the failure stays readable.
pub(super) struct LoadOutcome {
    pub(super) contents: Option<Arc<SiteContents>>,
    pub(super) error: Option<CacheError>,
}

impl LoadOutcome {
    fn failed(error: CacheError) -> Self {
        Self {
            contents: None,
            error: Some(error),
        }
    }
}

impl Loader {
    pub(super) fn new(tree: Arc<dyn FileTree>, registry: SiteRegistry, root_settings: SiteSettings) -> Self {
        Self {
            tree,
            registry,
            root_settings: Arc::new(root_settings),
            settings: RwLock::new(FxHashMap::default()),
            statics: None,
        }
    }

    pub(super) fn root_settings(&self) -> &SiteSettings {
        &self.root_settings
    }

    /// Settings of `site`: its own `synamic.toml` merged over its parent's,
    /// or the parent's as they are.
    pub(super) fn site_settings(&self, site: &SiteId) -> Result<Arc<SiteSettings>, CacheError> {
        if let Some(settings) = self.settings.read().get(site) {
            return Ok(settings.clone());
        }
        self.registry.get(site)?;

        let settings = match site.parent_id() {
            None => self.root_settings.clone(),
            Some(parent) => {
                let parent = self.site_settings(&parent)?;
                let path = self.registry.site_root_path(site).join(SETTINGS_FILE_NAME);
                if self.tree.exists(&path) {
                    let text = self
                        .tree
                        .read_text(&path)
                        .map_err(|err| CacheError::io(&path, err))?;
                    Arc::new(parent.inherit(&text)?)
                } else {
                    parent
                }
            }
        };

        Ok(self
            .settings
            .write()
            .entry(site.clone())
            .or_insert(settings)
            .clone())
    }

    pub(super) fn load_site(&self, site: &SiteId, injected: &Registries) -> LoadOutcome {
        let settings = match self.site_settings(site) {
            Ok(settings) => settings,
            Err(err) => return LoadOutcome::failed(err),
        };
        if settings.backend == Backend::Database {
            return LoadOutcome::failed(CacheError::NotImplemented("the database backend"));
        }
        let scope = match UrlScope::from_settings(&settings, site.clone()) {
            Ok(scope) => scope,
            Err(err) => return LoadOutcome::failed(err.into()),
        };

        let site_root = self.registry.site_root_path(site);
        let markers = injected
            .markers
            .clone()
            .unwrap_or_else(|| SettingsMarkerRegistry::shared(&settings));
        let models = injected.models.clone().unwrap_or_else(|| {
            Arc::new(TreeModelRegistry::new(
                self.tree.clone(),
                site_root.join(&settings.dirs.models),
            ))
        });
        let resolver = Arc::new(SiteResolver::new(markers.clone(), &settings));

        let mut build = SiteBuild {
            loader: self,
            site,
            contents_dir: site_root.join(&settings.dirs.contents),
            models,
            markers,
            resolver: resolver.clone(),
            scope,
            contents: SiteContents::new(site.clone(), settings),
        };
        let result = build.run();

        let contents = Arc::new(build.contents);
        resolver.attach(&contents);

        if result.is_ok() {
            debug!(
                "cache";
                "loaded {}, {}, {} for site {}",
                plural_count(contents.order.len(), "content"),
                plural_count(contents.markers.len(), "marker"),
                plural_count(contents.urls.len(), "url"),
                site
            );
        }
        LoadOutcome {
            contents: Some(contents),
            error: result.err(),
        }
    }
}

/// One in-progress load of a site.
struct SiteBuild<'a> {
    loader: &'a Loader,
    site: &'a SiteId,
    contents_dir: PathBuf,
    models: Arc<dyn ModelRegistry>,
    markers: Arc<dyn MarkerRegistry>,
    resolver: Arc<SiteResolver>,
    scope: UrlScope,
    contents: SiteContents,
}

impl SiteBuild<'_> {
    fn run(&mut self) -> Result<(), CacheError> {
        self.cache_markers()?;
        self.cache_content_metas()?;
        self.cache_urls()
    }

    fn cache_markers(&mut self) -> Result<(), CacheError> {
        if !self.contents.markers.is_empty() {
            return Ok(());
        }
        for marker_id in self.markers.marker_ids() {
            if self.contents.markers.contains_key(&marker_id) {
                return Err(CacheError::DuplicateMarker(marker_id));
            }
            if let Some(marker) = self.markers.make_marker(&marker_id) {
                self.contents.markers.insert(marker_id, marker);
            }
        }
        Ok(())
    }

    fn cache_content_metas(&mut self) -> Result<(), CacheError> {
        let loader = self.loader;
        let tree = loader.tree.as_ref();
        let paths = tree
            .list_file_paths(&self.contents_dir)
            .map_err(|err| CacheError::io(&self.contents_dir, err))?;
        let mut layers = DirectoryLayers::new(
            tree,
            self.contents_dir.clone(),
            &self.contents.settings.dirs.dir_meta_file_name,
        );

        for path in paths {
            if layers.is_meta_file(&path) {
                continue;
            }
            if !is_markdown(&path) {
                self.forward_static(path);
                continue;
            }
            let fields = self.build_fields(&mut layers, &path)?;
            self.insert_content(fields)?;
        }
        Ok(())
    }

    fn forward_static(&mut self, path: PathBuf) {
        debug!("cache"; "static file {}", path.display());
        if let Some(sink) = &self.loader.statics {
            sink.forward(self.site, &path);
        }
        self.contents.statics.push(path);
    }

    fn build_fields(&self, layers: &mut DirectoryLayers<'_>, path: &Path) -> Result<Arc<ContentFields>, CacheError> {
        let text = self
            .loader
            .tree
            .read_text(path)
            .map_err(|err| CacheError::io(path, err))?;
        let rel = content_relative_path(&self.contents_dir, path);

        let (front_matter, body) = split_front_matter(&rel, &text)?;
        let raw = layers.fields_for(path, front_matter)?;

        let model_name = raw
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or(CONTENT_MODEL);
        let model = self.models.get_model(model_name)?;
        let permalink = derive_permalink(&rel, &raw);
        let url = ContentUrl::parse(self.scope.clone(), &permalink, DocumentKind::HtmlDocument)?;

        Ok(ContentFields::new(
            rel,
            url,
            raw,
            body,
            model,
            self.resolver.clone(),
        ))
    }

    /// Index one content. Nothing of a rejected content is kept.
    fn insert_content(&mut self, fields: Arc<ContentFields>) -> Result<(), CacheError> {
        let path = fields.path().to_string();
        let content_id = fields.content_id()?;
        if let Some(id) = &content_id
            && let Some(first) = self.contents.by_id.get(id)
        {
            return Err(CacheError::DuplicateContentId {
                id: id.clone(),
                first: first.clone(),
                second: path,
            });
        }

        self.register_marks(&fields)?;
        if let Some(id) = content_id {
            self.contents.by_id.insert(id, path.clone());
        }
        self.contents.by_path.insert(path, fields.clone());
        self.contents.order.push(fields);
        Ok(())
    }

    /// Add marks of marker fields to their markers.
    fn register_marks(&mut self, fields: &ContentFields) -> Result<(), CacheError> {
        for (key, marker_id) in fields.model().marker_fields() {
            if !fields.raw().contains_key(key) {
                continue;
            }
            let Some(Value::Marks(marks)) = fields.get(key)? else {
                continue;
            };
            match self.contents.markers.get_mut(marker_id) {
                Some(marker) => {
                    let added = marker.absorb(marks);
                    if added > 0 {
                        debug!(
                            "cache";
                            "{} new mark{} in `{}` from {}",
                            added, plural_s(added), marker_id, fields.path()
                        );
                    }
                }
                None => debug!("cache"; "`{}` uses unknown marker `{}`", fields.path(), marker_id),
            }
        }
        Ok(())
    }

    fn cache_urls(&mut self) -> Result<(), CacheError> {
        for fields in &self.contents.order {
            let url = fields.url();
            if let Some(first) = self.contents.urls.get(url) {
                return Err(CacheError::DuplicateUrl {
                    url: url.to_string(),
                    first: first.clone(),
                    second: fields.path().to_string(),
                });
            }
            self.contents
                .urls
                .insert(url.clone(), fields.path().to_string());
        }
        Ok(())
    }
}

/// `sites/blog/contents/posts/a.md` -> `posts/a.md`
fn content_relative_path(contents_dir: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(contents_dir).unwrap_or(path);
    rel.components()
        .map(|comp| comp.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
