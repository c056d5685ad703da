//! Site-scoped content URLs.

use std::fmt;
use std::hash::{Hash, Hasher};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Serialize, Serializer};

use super::{AddressError, DocumentKind, PathAddress};
use crate::config::SiteSettings;
use crate::site::SiteId;

/// Characters left as-is when encoding a URL path.
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b':')
    .remove(b'#')
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Where a site's URLs live: the host base path plus the site id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrlScope {
    pub base: PathAddress,
    pub site: SiteId,
}

impl UrlScope {
    pub fn new(base: PathAddress, site: SiteId) -> Self {
        Self { base, site }
    }

    pub fn from_settings(settings: &SiteSettings, site: SiteId) -> Result<Self, AddressError> {
        Ok(Self::new(PathAddress::parse(&settings.host_base_path)?, site))
    }

    /// Scope of the root site under `/`.
    pub fn root() -> Self {
        Self::new(PathAddress::root(), SiteId::root())
    }

    /// Components prepended to every local path of this scope.
    fn prefix(&self) -> Vec<&str> {
        self.base
            .segments()
            .chain(self.site.components().iter().map(String::as_str))
            .collect()
    }
}

/// URL of a content entity.
///
/// Holds the site-local path and the kind; equality and hashing use the
/// site-scoped path, so identical local paths in two sites never collide.
#[derive(Debug, Clone)]
pub struct ContentUrl {
    scope: UrlScope,
    local: PathAddress,
    scoped: PathAddress,
    kind: DocumentKind,
}

impl ContentUrl {
    pub fn new(scope: UrlScope, local: PathAddress, kind: DocumentKind) -> Self {
        let local = if kind.is_html() && !names_html_file(&local) {
            local.with_trailing_slash()
        } else {
            local
        };
        let scoped = local.prefixed(&scope.prefix());
        Self {
            scope,
            local,
            scoped,
            kind,
        }
    }

    pub fn parse(scope: UrlScope, raw: &str, kind: DocumentKind) -> Result<Self, AddressError> {
        Ok(Self::new(scope, PathAddress::parse(raw)?, kind))
    }

    /// Join a relative path. `kind` defaults to this URL's kind.
    pub fn join(&self, other: &str, kind: Option<DocumentKind>) -> Result<Self, AddressError> {
        let other = PathAddress::parse(other)?;
        let local = self.local.join(&other)?;
        Ok(Self::new(
            self.scope.clone(),
            local,
            kind.unwrap_or(self.kind),
        ))
    }

    /// Same location, another kind (e.g. retrying a lookup as HTML).
    pub fn clone_with_kind(&self, kind: DocumentKind) -> Self {
        Self::new(self.scope.clone(), self.local.clone(), kind)
    }

    #[inline]
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    #[inline]
    pub fn site(&self) -> &SiteId {
        &self.scope.site
    }

    #[inline]
    pub fn scope(&self) -> &UrlScope {
        &self.scope
    }

    /// Path relative to the site.
    #[inline]
    pub fn local(&self) -> &PathAddress {
        &self.local
    }

    /// Host base path + site id + local path.
    #[inline]
    pub fn scoped(&self) -> &PathAddress {
        &self.scoped
    }

    fn ensure_kind(&self) -> Result<(), AddressError> {
        if self.kind.is_specified() {
            Ok(())
        } else {
            Err(AddressError::UnspecifiedKind(self.scoped.to_path_string()))
        }
    }

    /// Site-local path string.
    pub fn path_string(&self) -> Result<String, AddressError> {
        self.ensure_kind()?;
        Ok(self.local.to_path_string())
    }

    /// Output file path relative to the site output directory.
    ///
    /// HTML URLs ending with `/` get the index file name appended.
    pub fn to_filesystem_path(&self, index_file_name: &str) -> Result<String, AddressError> {
        let mut path = self.path_string()?;
        if self.kind.is_html() && path.ends_with('/') {
            path.push_str(index_file_name);
        }
        Ok(path)
    }

    /// Percent-encoded, site-scoped path. The canonical external form.
    pub fn to_site_scoped_string(&self) -> Result<String, AddressError> {
        self.ensure_kind()?;
        Ok(utf8_percent_encode(&self.scoped.to_path_string(), PATH_ENCODE_SET).to_string())
    }

    /// `scheme://hostname[:port]` followed by the site-scoped path.
    pub fn to_absolute_url(&self, settings: &SiteSettings) -> Result<String, AddressError> {
        let path = self.to_site_scoped_string()?;
        let port = settings
            .host_port
            .map(|port| format!(":{port}"))
            .unwrap_or_default();
        Ok(format!(
            "{}://{}{}{}",
            settings.host_scheme, settings.hostname, port, path
        ))
    }
}

fn names_html_file(local: &PathAddress) -> bool {
    if local.has_trailing_slash() {
        return false;
    }
    local.last_segment().is_some_and(|seg| {
        let lower = seg.to_ascii_lowercase();
        lower.ends_with(".html") || lower.ends_with(".htm")
    })
}

impl PartialEq for ContentUrl {
    fn eq(&self, other: &Self) -> bool {
        self.scoped == other.scoped
    }
}

impl Eq for ContentUrl {}

impl Hash for ContentUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.scoped.hash(state);
    }
}

impl fmt::Display for ContentUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.scoped.to_path_string())
    }
}

impl Serialize for ContentUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(base: &str, site: &str) -> UrlScope {
        UrlScope::new(PathAddress::parse(base).unwrap(), SiteId::parse(site).unwrap())
    }

    #[test]
    fn test_html_forces_trailing_slash() {
        let url = ContentUrl::parse(UrlScope::root(), "/about", DocumentKind::HtmlDocument).unwrap();
        assert_eq!(url.path_string().unwrap(), "/about/");

        let url =
            ContentUrl::parse(UrlScope::root(), "/feed.html", DocumentKind::HtmlDocument).unwrap();
        assert_eq!(url.path_string().unwrap(), "/feed.html");

        let url = ContentUrl::parse(UrlScope::root(), "/a.png", DocumentKind::BinaryDocument).unwrap();
        assert_eq!(url.path_string().unwrap(), "/a.png");
    }

    #[test]
    fn test_filesystem_path() {
        let url = ContentUrl::parse(UrlScope::root(), "/post/", DocumentKind::HtmlDocument).unwrap();
        assert_eq!(url.to_filesystem_path("index.html").unwrap(), "/post/index.html");

        let root = ContentUrl::new(UrlScope::root(), PathAddress::root(), DocumentKind::HtmlDocument);
        assert_eq!(root.to_filesystem_path("index.html").unwrap(), "/index.html");

        let css = ContentUrl::parse(UrlScope::root(), "/s.css", DocumentKind::TextDocument).unwrap();
        assert_eq!(css.to_filesystem_path("index.html").unwrap(), "/s.css");
    }

    #[test]
    fn test_unspecified_kind_cannot_materialize() {
        let url = ContentUrl::parse(UrlScope::root(), "/x/", DocumentKind::Unspecified).unwrap();
        assert!(matches!(url.path_string(), Err(AddressError::UnspecifiedKind(_))));
        assert!(url.to_filesystem_path("index.html").is_err());
        assert!(url.to_site_scoped_string().is_err());
        // still usable as a lookup key
        let html = ContentUrl::parse(UrlScope::root(), "/x/", DocumentKind::HtmlDocument).unwrap();
        assert_eq!(url, html);
    }

    #[test]
    fn test_equality_is_site_scoped() {
        let a = ContentUrl::parse(scope("/", "blog"), "/post/", DocumentKind::HtmlDocument).unwrap();
        let b = ContentUrl::parse(scope("/", "docs"), "/post/", DocumentKind::HtmlDocument).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.local(), b.local());

        let c = ContentUrl::parse(scope("/", "blog"), "post", DocumentKind::HtmlDocument).unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn test_site_scoped_string_encodes() {
        let url = ContentUrl::parse(
            scope("/sub/", "blog::fr"),
            "/café au lait/",
            DocumentKind::HtmlDocument,
        )
        .unwrap();
        assert_eq!(
            url.to_site_scoped_string().unwrap(),
            "/sub/blog/fr/caf%C3%A9%20au%20lait/"
        );
    }

    #[test]
    fn test_join_inherits_kind() {
        let base = ContentUrl::parse(UrlScope::root(), "/docs", DocumentKind::HtmlDocument).unwrap();
        let joined = base.join("guide", None).unwrap();
        assert_eq!(joined.kind(), DocumentKind::HtmlDocument);
        assert_eq!(joined.path_string().unwrap(), "/docs/guide/");

        let asset = base.join("logo.png", Some(DocumentKind::BinaryDocument)).unwrap();
        assert_eq!(asset.path_string().unwrap(), "/docs/logo.png");
    }

    #[test]
    fn test_clone_with_kind() {
        let url = ContentUrl::parse(UrlScope::root(), "/x", DocumentKind::Unspecified).unwrap();
        let html = url.clone_with_kind(DocumentKind::HtmlDocument);
        assert_eq!(html.path_string().unwrap(), "/x/");
        assert_ne!(url, html);
    }

    #[test]
    fn test_absolute_url() {
        let mut settings = SiteSettings::default();
        settings.hostname = "example.com".into();
        settings.host_scheme = "https".into();
        settings.host_port = Some(8080);
        let url = ContentUrl::parse(scope("/", "blog"), "/hello/", DocumentKind::HtmlDocument).unwrap();
        assert_eq!(
            url.to_absolute_url(&settings).unwrap(),
            "https://example.com:8080/blog/hello/"
        );

        settings.host_port = None;
        assert_eq!(
            url.to_absolute_url(&settings).unwrap(),
            "https://example.com/blog/hello/"
        );
    }
}
