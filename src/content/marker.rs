//! Markers: tag and category style classifications.
//!
//! A [`Marker`] (e.g. `tags`) owns a set of [`Mark`]s (e.g. `rust`, `howto`).
//! Marks are collected from content fields while the cache loads, so the
//! mark set grows with the content.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::Value;
use crate::config::{MarkerConfig, SiteSettings};
use crate::utils::slug::slugify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// At most one mark per content (e.g. a series).
    Single,
    Multiple,
    /// Marks are `/`-separated paths (`lang/rust`).
    Hierarchical,
}

impl MarkerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
            Self::Hierarchical => "hierarchical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Some(Self::Single),
            "multiple" => Some(Self::Multiple),
            "hierarchical" => Some(Self::Hierarchical),
            _ => None,
        }
    }
}

/// One value of a marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Mark {
    pub id: String,
    pub title: String,
}

impl Mark {
    /// Mark with a slug id derived from its title.
    pub fn new(title: &str) -> Self {
        let title = title.trim();
        Self {
            id: slugify(title),
            title: title.to_string(),
        }
    }

    /// Matches by id or, ignoring case, by title.
    pub fn matches(&self, text: &str) -> bool {
        let text = text.trim();
        self.id == text || self.title.to_lowercase() == text.to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Marker {
    pub id: String,
    pub kind: MarkerKind,
    pub title: String,
    pub marks: Vec<Mark>,
}

impl Marker {
    pub fn new(id: impl Into<String>, kind: MarkerKind, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            marks: Vec::new(),
        }
    }

    pub fn get_mark(&self, id: &str) -> Option<&Mark> {
        self.marks.iter().find(|mark| mark.id == id)
    }

    /// Add marks not seen before. Returns how many were new.
    pub fn absorb<I>(&mut self, marks: I) -> usize
    where
        I: IntoIterator<Item = Mark>,
    {
        let mut added = 0;
        for mark in marks {
            if self.get_mark(&mark.id).is_none() {
                self.marks.push(mark);
                added += 1;
            }
        }
        added
    }
}

/// Turns a raw field value into marks for one marker kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkConverter {
    kind: MarkerKind,
}

impl MarkConverter {
    pub fn new(kind: MarkerKind) -> Self {
        Self { kind }
    }

    /// Strings are comma separated, lists give one mark per element.
    /// Single markers keep only the first mark.
    pub fn convert(&self, raw: &Value) -> Vec<Mark> {
        let titles: Vec<String> = match raw {
            Value::List(items) => items.iter().map(ToString::to_string).collect(),
            Value::Marks(marks) => return marks.clone(),
            Value::Null => Vec::new(),
            other => other.to_string().split(',').map(str::to_string).collect(),
        };

        let mut marks: Vec<Mark> = Vec::new();
        for title in titles {
            let mark = match self.kind {
                MarkerKind::Hierarchical => hierarchical_mark(&title),
                _ => Mark::new(&title),
            };
            if mark.id.is_empty() || marks.iter().any(|m| m.id == mark.id) {
                continue;
            }
            marks.push(mark);
        }
        if self.kind == MarkerKind::Single {
            marks.truncate(1);
        }
        marks
    }
}

impl Default for MarkConverter {
    fn default() -> Self {
        Self::new(MarkerKind::Multiple)
    }
}

/// `Lang / Rust` becomes id `lang/rust` with title `Lang / Rust`.
fn hierarchical_mark(title: &str) -> Mark {
    let id = title
        .split('/')
        .map(slugify)
        .filter(|seg| !seg.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    Mark {
        id,
        title: title.trim().to_string(),
    }
}

/// Source of marker definitions.
pub trait MarkerRegistry: Send + Sync {
    fn marker_ids(&self) -> Vec<String>;

    /// Fresh marker without marks, `None` for unknown ids.
    fn make_marker(&self, id: &str) -> Option<Marker>;

    fn converter(&self, id: &str) -> Option<MarkConverter>;
}

/// Markers defined by `[markers.<id>]` settings.
///
/// `tags` (multiple) and `categories` (hierarchical) always exist unless the
/// settings redefine them.
#[derive(Debug, Clone)]
pub struct SettingsMarkerRegistry {
    markers: BTreeMap<String, MarkerConfig>,
}

impl SettingsMarkerRegistry {
    pub fn new(settings: &SiteSettings) -> Self {
        let mut markers = settings.markers.clone();
        markers.entry("tags".into()).or_insert(MarkerConfig {
            kind: MarkerKind::Multiple,
            title: Some("Tags".into()),
        });
        markers.entry("categories".into()).or_insert(MarkerConfig {
            kind: MarkerKind::Hierarchical,
            title: Some("Categories".into()),
        });
        Self { markers }
    }

    pub fn shared(settings: &SiteSettings) -> Arc<dyn MarkerRegistry> {
        Arc::new(Self::new(settings))
    }
}

impl MarkerRegistry for SettingsMarkerRegistry {
    fn marker_ids(&self) -> Vec<String> {
        self.markers.keys().cloned().collect()
    }

    fn make_marker(&self, id: &str) -> Option<Marker> {
        let config = self.markers.get(id)?;
        let title = config.title.clone().unwrap_or_else(|| id.to_string());
        Some(Marker::new(id, config.kind, title))
    }

    fn converter(&self, id: &str) -> Option<MarkConverter> {
        self.markers.get(id).map(|config| MarkConverter::new(config.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_matches() {
        let mark = Mark::new("Rust Lang");
        assert_eq!(mark.id, "rust-lang");
        assert!(mark.matches("rust-lang"));
        assert!(mark.matches("RUST LANG"));
        assert!(!mark.matches("rust"));
    }

    #[test]
    fn test_converter_splits_and_dedups() {
        let marks = MarkConverter::default().convert(&Value::from("Rust, howto, rust,  "));
        let ids: Vec<_> = marks.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["rust", "howto"]);

        let list = Value::List(vec![Value::from("a"), Value::Int(2)]);
        let ids: Vec<_> = MarkConverter::default()
            .convert(&list)
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, ["a", "2"]);
    }

    #[test]
    fn test_converter_single_and_hierarchical() {
        let single = MarkConverter::new(MarkerKind::Single).convert(&Value::from("one, two"));
        assert_eq!(single.len(), 1);

        let tree = MarkConverter::new(MarkerKind::Hierarchical).convert(&Value::from("Lang / Rust"));
        assert_eq!(tree[0].id, "lang/rust");
        assert_eq!(tree[0].title, "Lang / Rust");
    }

    #[test]
    fn test_marker_absorb() {
        let mut marker = Marker::new("tags", MarkerKind::Multiple, "Tags");
        assert_eq!(marker.absorb([Mark::new("a"), Mark::new("b")]), 2);
        assert_eq!(marker.absorb([Mark::new("A"), Mark::new("c")]), 1);
        assert_eq!(marker.marks.len(), 3);
    }

    #[test]
    fn test_settings_registry_defaults() {
        let mut settings = SiteSettings::default();
        settings.markers.insert(
            "series".into(),
            MarkerConfig {
                kind: MarkerKind::Single,
                title: None,
            },
        );
        let registry = SettingsMarkerRegistry::new(&settings);
        assert_eq!(registry.marker_ids(), ["categories", "series", "tags"]);
        assert_eq!(registry.make_marker("series").unwrap().title, "series");
        assert_eq!(
            registry.make_marker("categories").unwrap().kind,
            MarkerKind::Hierarchical
        );
        assert!(registry.make_marker("nope").is_none());
        assert!(registry.converter("tags").is_some());
    }
}
