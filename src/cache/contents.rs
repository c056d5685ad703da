//! Loaded contents of one site.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock, Weak};

use rustc_hash::FxHashMap;

use crate::address::ContentUrl;
use crate::config::SiteSettings;
use crate::content::{
    Chapter, ContentError, ContentFields, FieldResolver, Mark, Marker, MarkerRegistry, Paginated,
    Value, normalize_content_path, paginate,
};
use crate::site::SiteId;

/// Indexes built by one load of a site.
///
/// Immutable once published; a reload builds a fresh one.
#[derive(Debug)]
pub struct SiteContents {
    pub(super) site: SiteId,
    pub(super) settings: Arc<SiteSettings>,
    /// Content path (relative to the contents dir) -> fields.
    pub(super) by_path: FxHashMap<String, Arc<ContentFields>>,
    /// Contents in load order.
    pub(super) order: Vec<Arc<ContentFields>>,
    /// Content id -> content path.
    pub(super) by_id: FxHashMap<String, String>,
    /// Permalink URL -> content path.
    pub(super) urls: FxHashMap<ContentUrl, String>,
    pub(super) markers: BTreeMap<String, Marker>,
    pub(super) statics: Vec<PathBuf>,
}

impl SiteContents {
    pub(super) fn new(site: SiteId, settings: Arc<SiteSettings>) -> Self {
        Self {
            site,
            settings,
            by_path: FxHashMap::default(),
            order: Vec::new(),
            by_id: FxHashMap::default(),
            urls: FxHashMap::default(),
            markers: BTreeMap::new(),
            statics: Vec::new(),
        }
    }

    pub fn site(&self) -> &SiteId {
        &self.site
    }

    pub fn settings(&self) -> &SiteSettings {
        &self.settings
    }

    pub fn contents(&self) -> &[Arc<ContentFields>] {
        &self.order
    }

    pub fn get(&self, path: &str) -> Option<&Arc<ContentFields>> {
        self.by_path.get(&normalize_content_path(path))
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Arc<ContentFields>> {
        self.by_id.get(id).and_then(|path| self.by_path.get(path))
    }

    pub fn get_by_url(&self, url: &ContentUrl) -> Option<&Arc<ContentFields>> {
        self.urls.get(url).and_then(|path| self.by_path.get(path))
    }

    /// URL index sorted by URL.
    pub fn urls(&self) -> Vec<(&ContentUrl, &str)> {
        let mut urls: Vec<_> = self
            .urls
            .iter()
            .map(|(url, path)| (url, path.as_str()))
            .collect();
        urls.sort_by(|a, b| a.0.scoped().components().cmp(b.0.scoped().components()));
        urls
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    pub fn statics(&self) -> &[PathBuf] {
        &self.statics
    }
}

/// Field resolver bound to one load of a site.
///
/// Holds the contents weakly: fields outliving a reload can no longer
/// paginate or resolve chapters against stale data.
pub(super) struct SiteResolver {
    contents: OnceLock<Weak<SiteContents>>,
    markers: Arc<dyn MarkerRegistry>,
    per_page: usize,
    partition: String,
}

impl SiteResolver {
    pub(super) fn new(markers: Arc<dyn MarkerRegistry>, settings: &SiteSettings) -> Self {
        Self {
            contents: OnceLock::new(),
            markers,
            per_page: settings.pagination_per_page,
            partition: settings.url_partition_comp.clone(),
        }
    }

    pub(super) fn attach(&self, contents: &Arc<SiteContents>) {
        let _ = self.contents.set(Arc::downgrade(contents));
    }

    fn contents(&self) -> Option<Arc<SiteContents>> {
        self.contents.get().and_then(Weak::upgrade)
    }
}

impl FieldResolver for SiteResolver {
    fn convert_marks(&self, marker_id: &str, raw: &Value) -> Vec<Mark> {
        self.markers
            .converter(marker_id)
            .unwrap_or_default()
            .convert(raw)
    }

    fn paginate(&self, origin: &Arc<ContentFields>, raw: &Value) -> Result<Arc<Paginated>, ContentError> {
        let contents = self.contents().ok_or_else(|| ContentError::Pagination {
            path: origin.path().to_string(),
            message: "site contents are not loaded".into(),
        })?;
        let paginated = paginate(origin, raw, &contents.order, self.per_page, &self.partition)?;
        Ok(Arc::new(paginated))
    }

    fn chapters(&self, raw: &Value) -> Result<Arc<[Chapter]>, ContentError> {
        let contents = self
            .contents()
            .ok_or_else(|| ContentError::Chapters("site contents are not loaded".into()))?;
        Chapter::parse_all(raw, |path| contents.by_path.get(path).cloned())
    }
}
