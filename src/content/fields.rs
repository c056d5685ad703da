//! Lazily converted content fields.
//!
//! ```text
//! raw (layered front matter)      converted (filled on first get)
//! ┌──────────────────────────┐    ┌──────────────────────────────┐
//! │ created: "2024-03-01"    │ -> │ created: DateTime(2024-03-01) │
//! │ tags: "rust, howto"      │ -> │ tags: Marks[rust, howto]      │
//! │ pagination: "type==post" │ -> │ pagination: Page(1 of 3)      │
//! └──────────────────────────┘    └──────────────────────────────┘
//! ```
//!
//! Raw fields are immutable. [`Fields::set`] only writes the converted layer.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::chapter::Chapter;
use super::pagination::Paginated;
use super::{ContentError, FieldModel, Mark, MarkConverter, RawFields, Value};
use crate::address::{ContentUrl, DocumentKind};

/// Key expanded into a [`Paginated`] view.
pub const PAGINATION_KEY: &str = "pagination";
/// Key expanded into a list of [`Chapter`]s.
pub const CHAPTERS_KEY: &str = "chapters";

/// Read access shared by every content entity.
pub trait Fields: Send + Sync + fmt::Debug {
    /// Converted value of `key`, `None` when the entity has no such field.
    fn get(&self, key: &str) -> Result<Option<Value>, ContentError>;

    /// Overwrite the converted value of `key`.
    fn set(&self, key: &str, value: Value);

    /// All field names, sorted.
    fn keys(&self) -> Vec<String>;

    fn url(&self) -> &ContentUrl;

    fn kind(&self) -> DocumentKind {
        self.url().kind()
    }

    fn get_or(&self, key: &str, default: Value) -> Result<Value, ContentError> {
        Ok(self.get(key)?.unwrap_or(default))
    }
}

/// Site-dependent conversions a [`ContentFields`] delegates to its owner.
pub trait FieldResolver: Send + Sync {
    fn convert_marks(&self, marker_id: &str, raw: &Value) -> Vec<Mark>;

    fn paginate(&self, origin: &Arc<ContentFields>, raw: &Value) -> Result<Arc<Paginated>, ContentError>;

    fn chapters(&self, raw: &Value) -> Result<Arc<[Chapter]>, ContentError>;
}

/// Resolver for fields outside any site cache.
///
/// Marks use the default converter; pagination fails and chapters can only
/// carry titles.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedResolver;

impl FieldResolver for DetachedResolver {
    fn convert_marks(&self, _marker_id: &str, raw: &Value) -> Vec<Mark> {
        MarkConverter::default().convert(raw)
    }

    fn paginate(&self, origin: &Arc<ContentFields>, _raw: &Value) -> Result<Arc<Paginated>, ContentError> {
        Err(ContentError::Pagination {
            path: origin.path().to_string(),
            message: "content is not attached to a site".into(),
        })
    }

    fn chapters(&self, raw: &Value) -> Result<Arc<[Chapter]>, ContentError> {
        Chapter::parse_all(raw, |_| None)
    }
}

/// Fields of one markdown file.
pub struct ContentFields {
    this: Weak<ContentFields>,
    path: String,
    url: ContentUrl,
    body: String,
    raw: RawFields,
    converted: RwLock<FxHashMap<String, Value>>,
    model: Arc<FieldModel>,
    resolver: Arc<dyn FieldResolver>,
    paginated: OnceLock<Arc<Paginated>>,
}

impl ContentFields {
    /// `path` is relative to the site's contents directory.
    pub fn new(
        path: impl Into<String>,
        url: ContentUrl,
        raw: RawFields,
        body: impl Into<String>,
        model: Arc<FieldModel>,
        resolver: Arc<dyn FieldResolver>,
    ) -> Arc<Self> {
        let path = path.into();
        let body = body.into();
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            path,
            url,
            body,
            raw,
            converted: RwLock::new(FxHashMap::default()),
            model,
            resolver,
            paginated: OnceLock::new(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn raw(&self) -> &RawFields {
        &self.raw
    }

    pub fn model(&self) -> &FieldModel {
        &self.model
    }

    /// The `id` field as text, if set.
    pub fn content_id(&self) -> Result<Option<String>, ContentError> {
        Ok(self
            .get("id")?
            .map(|id| id.to_string())
            .filter(|id| !id.trim().is_empty()))
    }

    /// Every pagination page, once `pagination` has been expanded.
    pub fn pagination(&self) -> Result<Option<Arc<Paginated>>, ContentError> {
        match self.raw.get(PAGINATION_KEY) {
            Some(raw) => self.expand_pagination(raw).map(Some),
            None => Ok(None),
        }
    }

    fn expand_pagination(&self, raw: &Value) -> Result<Arc<Paginated>, ContentError> {
        if let Some(paginated) = self.paginated.get() {
            return Ok(paginated.clone());
        }
        let origin = self.this.upgrade().ok_or_else(|| ContentError::Pagination {
            path: self.path.clone(),
            message: "content was dropped".into(),
        })?;
        let paginated = self.resolver.paginate(&origin, raw)?;
        Ok(self.paginated.get_or_init(|| paginated).clone())
    }

    fn convert(&self, key: &str, raw: &Value) -> Result<Value, ContentError> {
        Ok(match key {
            PAGINATION_KEY => Value::Page(self.expand_pagination(raw)?.first()),
            CHAPTERS_KEY => Value::Chapters(self.resolver.chapters(raw)?),
            _ => match self.model.get(key) {
                Some(field_type) => field_type.convert(raw, self.resolver.as_ref()),
                None => raw.clone(),
            },
        })
    }
}

impl Fields for ContentFields {
    fn get(&self, key: &str) -> Result<Option<Value>, ContentError> {
        if let Some(value) = self.converted.read().get(key) {
            return Ok(Some(value.clone()));
        }
        let Some(raw) = self.raw.get(key) else {
            return Ok(None);
        };

        // No lock is held while converting: pagination runs queries that
        // read other fields, possibly of this same content.
        let value = self.convert(key, raw)?;
        let mut converted = self.converted.write();
        Ok(Some(converted.entry(key.to_string()).or_insert(value).clone()))
    }

    fn set(&self, key: &str, value: Value) {
        self.converted.write().insert(key.to_string(), value);
    }

    fn keys(&self) -> Vec<String> {
        let converted = self.converted.read();
        let keys: BTreeSet<&String> = self.raw.keys().chain(converted.keys()).collect();
        keys.into_iter().cloned().collect()
    }

    fn url(&self) -> &ContentUrl {
        &self.url
    }
}

impl PartialEq for ContentFields {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for ContentFields {}

impl Hash for ContentFields {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
    }
}

impl fmt::Debug for ContentFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentFields")
            .field("path", &self.path)
            .field("url", &self.url)
            .field("model", &self.model.name)
            .field("raw", &self.raw)
            .finish_non_exhaustive()
    }
}

/// Overrides layered on an origin without touching it.
///
/// Pagination pages after the first are generated fields: same content,
/// their own URL and `pagination` value.
pub struct GeneratedFields {
    origin: Arc<ContentFields>,
    url: ContentUrl,
    overrides: RwLock<FxHashMap<String, Value>>,
}

impl GeneratedFields {
    pub fn new(origin: Arc<ContentFields>, url: ContentUrl) -> Self {
        Self {
            origin,
            url,
            overrides: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn with(self, key: &str, value: Value) -> Self {
        self.set(key, value);
        self
    }

    pub fn origin(&self) -> &Arc<ContentFields> {
        &self.origin
    }
}

impl Fields for GeneratedFields {
    fn get(&self, key: &str) -> Result<Option<Value>, ContentError> {
        if let Some(value) = self.overrides.read().get(key) {
            return Ok(Some(value.clone()));
        }
        self.origin.get(key)
    }

    fn set(&self, key: &str, value: Value) {
        self.overrides.write().insert(key.to_string(), value);
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: BTreeSet<String> = self.origin.keys().into_iter().collect();
        keys.extend(self.overrides.read().keys().cloned());
        keys.into_iter().collect()
    }

    fn url(&self) -> &ContentUrl {
        &self.url
    }
}

impl fmt::Debug for GeneratedFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedFields")
            .field("origin", &self.origin.path)
            .field("url", &self.url)
            .field("overrides", &self.overrides.read().keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Plain key/value content with no file and no model.
#[derive(Debug)]
pub struct SyntheticFields {
    url: ContentUrl,
    values: RwLock<RawFields>,
}

impl SyntheticFields {
    pub fn new(url: ContentUrl) -> Self {
        Self {
            url,
            values: RwLock::new(RawFields::new()),
        }
    }

    pub fn with(self, key: &str, value: Value) -> Self {
        self.set(key, value);
        self
    }
}

impl Fields for SyntheticFields {
    fn get(&self, key: &str) -> Result<Option<Value>, ContentError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) {
        self.values.write().insert(key.to_string(), value);
    }

    fn keys(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }

    fn url(&self) -> &ContentUrl {
        &self.url
    }
}
