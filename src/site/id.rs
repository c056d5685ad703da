//! Hierarchical site identifier (`blog::fr`).

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::SiteError;

/// Separator between site id components.
pub const SITE_ID_SEPARATOR: &str = "::";

/// Identifier of a site in the site tree.
///
/// An ordered tuple of non-empty, whitespace-free components. The empty tuple
/// is the root site. Path separators inside components are treated as
/// component boundaries too, so `blog/fr` and `blog::fr` are the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SiteId(Arc<[String]>);

impl SiteId {
    /// The root site id.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse `a::b::c`. Both `""` and `"::"` denote the root site.
    pub fn parse(raw: &str) -> Result<Self, SiteError> {
        Self::from_components([raw])
    }

    /// Build an id from parts, each of which may itself contain separators.
    pub fn from_components<I, S>(parts: I) -> Result<Self, SiteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut components = Vec::new();
        for part in parts {
            let part = part.as_ref();
            for piece in part.split(SITE_ID_SEPARATOR).flat_map(|p| p.split(['/', '\\'])) {
                if piece.is_empty() {
                    continue;
                }
                if piece.chars().any(char::is_whitespace) {
                    return Err(SiteError::InvalidSiteId(part.to_string()));
                }
                components.push(piece.to_string());
            }
        }
        Ok(Self(components.into()))
    }

    #[inline]
    pub fn components(&self) -> &[String] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Parent id, `None` for the root site.
    pub fn parent_id(&self) -> Option<Self> {
        match self.0.split_last() {
            Some((_, parent)) => Some(Self(parent.into())),
            None => None,
        }
    }

    /// Id of a direct child site.
    pub fn child(&self, name: &str) -> Result<Self, SiteError> {
        Self::from_components(self.0.iter().map(String::as_str).chain([name]))
    }

    /// Whether `self` is `other` or one of its ancestors.
    pub fn is_prefix_of(&self, other: &SiteId) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str(SITE_ID_SEPARATOR)
        } else {
            f.write_str(&self.0.join(SITE_ID_SEPARATOR))
        }
    }
}

impl FromStr for SiteId {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SiteId {
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

    #[test]
    fn test_parse_root() {
        assert!(SiteId::parse("").unwrap().is_root());
        assert!(SiteId::parse("::").unwrap().is_root());
        assert_eq!(SiteId::root().to_string(), "::");
    }

    #[test]
    fn test_parse_nested() {
        let id = SiteId::parse("blog::fr").unwrap();
        assert_eq!(id.components(), ["blog", "fr"]);
        assert_eq!(id.to_string(), "blog::fr");
        assert_eq!(SiteId::parse("blog/fr").unwrap(), id);
        assert_eq!(SiteId::parse("::blog::::fr::").unwrap(), id);
    }

    #[test]
    fn test_parse_rejects_whitespace() {
        assert!(matches!(
            SiteId::parse("my blog"),
            Err(SiteError::InvalidSiteId(_))
        ));
    }

    #[test]
    fn test_parse_rejects_blank_component() {
        assert!(matches!(
            SiteId::parse("a::  ::b"),
            Err(SiteError::InvalidSiteId(_))
        ));
        assert!(matches!(
            SiteId::parse("a/ "),
            Err(SiteError::InvalidSiteId(_))
        ));
    }

    #[test]
    fn test_parent_id() {
        let id = SiteId::parse("a::b::c").unwrap();
        assert_eq!(id.parent_id(), Some(SiteId::parse("a::b").unwrap()));
        assert_eq!(SiteId::parse("a").unwrap().parent_id(), Some(SiteId::root()));
        assert_eq!(SiteId::root().parent_id(), None);
    }

    #[test]
    fn test_child_and_prefix() {
        let blog = SiteId::parse("blog").unwrap();
        let fr = blog.child("fr").unwrap();
        assert_eq!(fr.to_string(), "blog::fr");
        assert!(blog.is_prefix_of(&fr));
        assert!(SiteId::root().is_prefix_of(&fr));
        assert!(!fr.is_prefix_of(&blog));
    }

    #[test]
    fn test_hash_on_components() {
        use rustc_hash::FxHashSet;

        let mut set = FxHashSet::default();
        set.insert(SiteId::parse("a::b").unwrap());
        set.insert(SiteId::parse("a/b").unwrap());
        assert_eq!(set.len(), 1);
    }
}
