//! Requested URL splitting for the router.
//!
//! ```text
//! http://host/sub/blog/posts/hello/_/2/?x=1
//!            └base┘└site┘└──local───┘ └special┘
//! ```

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use serde::Serialize;
use url::Url;

use super::{AddressError, PathAddress};
use crate::site::SiteId;

/// Dummy origin so that relative and absolute requests parse the same way.
static REQUEST_BASE: LazyLock<Url> = LazyLock::new(|| Url::parse("http://localhost/").unwrap());

/// A requested URL split into its site, local path and special components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestTarget {
    pub site: SiteId,
    /// Path inside the site, before the partition component.
    pub local: PathAddress,
    /// Components after the partition component (pagination segments).
    pub special: Vec<String>,
}

/// Splits requested URLs against a fixed set of known sites.
#[derive(Debug, Clone)]
pub struct RequestParser {
    base: PathAddress,
    /// Longest first, so nested sites win over their parents.
    site_ids: Vec<SiteId>,
    partition: String,
}

impl RequestParser {
    pub fn new<I>(base: PathAddress, site_ids: I, partition: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = SiteId>,
    {
        let mut site_ids: Vec<SiteId> = site_ids.into_iter().collect();
        site_ids.sort_by(|a, b| b.len().cmp(&a.len()));
        Self {
            base,
            site_ids,
            partition: partition.into(),
        }
    }

    pub fn parse(&self, raw: &str) -> Result<RequestTarget, AddressError> {
        let path = request_path(raw)?;
        let address = PathAddress::parse(&path)?;

        // Components after the leading empty one
        let mut segments: &[String] = &address.components()[1..];

        let base: Vec<&str> = self.base.segments().collect();
        if !base.is_empty() {
            let under_base = segments.len() >= base.len()
                && base.iter().zip(segments).all(|(b, s)| *b == s.as_str());
            if !under_base {
                return Err(AddressError::NoMatchingSite(raw.to_string()));
            }
            segments = &segments[base.len()..];
        }

        let site = self
            .site_ids
            .iter()
            .find(|id| {
                let comps = id.components();
                segments.len() >= comps.len() && segments[..comps.len()] == *comps
            })
            .ok_or_else(|| AddressError::NoMatchingSite(raw.to_string()))?;
        let segments = &segments[site.len()..];

        let (local, special) = match segments.iter().position(|s| *s == self.partition) {
            Some(idx) => (&segments[..idx], &segments[idx + 1..]),
            None => (segments, &[][..]),
        };

        let mut local_comps = Vec::with_capacity(local.len() + 1);
        local_comps.push(String::new());
        local_comps.extend(local.iter().cloned());

        Ok(RequestTarget {
            site: site.clone(),
            local: PathAddress::from_components(local_comps)?,
            special: special.iter().filter(|s| !s.is_empty()).cloned().collect(),
        })
    }
}

/// Split a request against `site_ids` with the root host base path.
pub fn parse_request(
    raw: &str,
    site_ids: &[SiteId],
    partition: &str,
) -> Result<RequestTarget, AddressError> {
    RequestParser::new(PathAddress::root(), site_ids.iter().cloned(), partition).parse(raw)
}

/// Decoded path of a request, without scheme, host, query or fragment.
fn request_path(raw: &str) -> Result<String, AddressError> {
    let collapsed = collapse_slashes(raw.trim());
    let parsed = REQUEST_BASE
        .join(&collapsed)
        .map_err(|err| AddressError::InvalidUrl {
            url: raw.to_string(),
            reason: err.to_string(),
        })?;
    percent_decode_str(parsed.path())
        .decode_utf8()
        .map(|path| path.into_owned())
        .map_err(|err| AddressError::InvalidUrl {
            url: raw.to_string(),
            reason: err.to_string(),
        })
}

/// Collapse runs of `/`, except the `//` following a scheme's `:`.
fn collapse_slashes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch == '/' && out.ends_with('/') && !out[..out.len() - 1].ends_with(':') {
            continue;
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{ContentUrl, DocumentKind, UrlScope};

    fn ids(raw: &[&str]) -> Vec<SiteId> {
        raw.iter().map(|id| SiteId::parse(id).unwrap()).collect()
    }

    #[test]
    fn test_collapse_slashes() {
        assert_eq!(collapse_slashes("//a///b/"), "/a/b/");
        assert_eq!(collapse_slashes("http://h//a"), "http://h/a");
        assert_eq!(collapse_slashes("http:////h"), "http://h");
    }

    #[test]
    fn test_longest_site_prefix_wins() {
        let sites = ids(&["::", "blog", "blog::fr"]);
        let target = parse_request("/blog/fr/hello/", &sites, "_").unwrap();
        assert_eq!(target.site.to_string(), "blog::fr");
        assert_eq!(target.local.to_path_string(), "/hello/");

        let target = parse_request("/blog/hello/", &sites, "_").unwrap();
        assert_eq!(target.site.to_string(), "blog");

        let target = parse_request("/about/", &sites, "_").unwrap();
        assert!(target.site.is_root());
        assert_eq!(target.local.to_path_string(), "/about/");
    }

    #[test]
    fn test_strips_scheme_query_fragment() {
        let sites = ids(&["::", "blog"]);
        let target =
            parse_request("https://example.com//blog//x/?page=2#top", &sites, "_").unwrap();
        assert_eq!(target.site.to_string(), "blog");
        assert_eq!(target.local.to_path_string(), "/x/");
    }

    #[test]
    fn test_partition_special_components() {
        let sites = ids(&["::"]);
        let target = parse_request("/posts/_/2/", &sites, "_").unwrap();
        assert_eq!(target.local.to_path_string(), "/posts");
        assert_eq!(target.special, ["2"]);
    }

    #[test]
    fn test_target_serializes_as_strings() {
        let sites = ids(&["::", "blog"]);
        let target = parse_request("/blog/posts/_/2/", &sites, "_").unwrap();
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(json["site"], "blog");
        assert_eq!(json["local"], "/posts");
        assert_eq!(json["special"][0], "2");
    }

    #[test]
    fn test_no_matching_site() {
        let sites = ids(&["blog"]);
        assert!(matches!(
            parse_request("/docs/x", &sites, "_"),
            Err(AddressError::NoMatchingSite(_))
        ));
    }

    #[test]
    fn test_base_path_must_prefix() {
        let parser = RequestParser::new(PathAddress::parse("/sub/").unwrap(), ids(&["::"]), "_");
        assert!(parser.parse("/sub/x/").is_ok());
        assert!(matches!(
            parser.parse("/other/x/"),
            Err(AddressError::NoMatchingSite(_))
        ));
    }

    #[test]
    fn test_round_trip_site_scoped_string() {
        let sites = ids(&["::", "blog", "blog::fr", "docs"]);
        let base = PathAddress::parse("/sub/").unwrap();
        let parser = RequestParser::new(base.clone(), sites.clone(), "_");

        for site in &sites {
            for local in ["/", "/post/", "/a/b/c.png", "/café au lait/"] {
                let url = ContentUrl::parse(
                    UrlScope::new(base.clone(), site.clone()),
                    local,
                    DocumentKind::HtmlDocument,
                )
                .unwrap();
                let encoded = url.to_site_scoped_string().unwrap();
                let target = parser.parse(&encoded).unwrap();
                assert_eq!(&target.site, url.site(), "{encoded}");
                assert_eq!(&target.local, url.local(), "{encoded}");
            }
        }
    }
}
