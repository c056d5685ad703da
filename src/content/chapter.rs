//! Chapters: an ordered table of contents stored in a `chapters` field.
//!
//! ```text
//! chapters:
//!   - intro/start.md                       content path only
//! chapters = [
//!   { title = "Setup", content = "setup.md" },
//!   { title = "Appendix" },                title only
//! ]
//! ```

use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::{ContentError, ContentFields, Fields, Value};

#[derive(Debug, Clone)]
pub struct Chapter {
    /// Explicit title, else the content's title.
    pub title: Option<String>,
    pub content: Option<Arc<ContentFields>>,
}

impl Chapter {
    /// Resolve every entry of a `chapters` value.
    ///
    /// `lookup` finds a content by its path relative to the contents
    /// directory.
    pub fn parse_all<F>(raw: &Value, lookup: F) -> Result<Arc<[Chapter]>, ContentError>
    where
        F: Fn(&str) -> Option<Arc<ContentFields>>,
    {
        let entries: &[Value] = match raw {
            Value::List(entries) => entries.as_slice(),
            Value::Null => &[],
            other => {
                return Err(ContentError::Chapters(format!(
                    "expected a list, got {}",
                    other.type_name()
                )));
            }
        };

        entries
            .iter()
            .map(|entry| Self::parse_entry(entry, &lookup))
            .collect()
    }

    fn parse_entry<F>(entry: &Value, lookup: &F) -> Result<Self, ContentError>
    where
        F: Fn(&str) -> Option<Arc<ContentFields>>,
    {
        let (title, path) = match entry {
            Value::Str(path) => (None, Some(path.as_str())),
            Value::Map(map) => (
                map.get("title").map(ToString::to_string),
                map.get("content").and_then(Value::as_str),
            ),
            other => {
                return Err(ContentError::Chapters(format!(
                    "entry must be a path or a map, got {}",
                    other.type_name()
                )));
            }
        };

        let content = match path {
            Some(path) => {
                let key = normalize_content_path(path);
                Some(lookup(&key).ok_or(ContentError::ChapterNotFound(key))?)
            }
            None => None,
        };

        let title = match (title, &content) {
            (Some(title), _) => Some(title),
            (None, Some(content)) => content.get("title")?.map(|title| title.to_string()),
            (None, None) => {
                return Err(ContentError::Chapters(
                    "entry needs a `title` or a `content`".into(),
                ));
            }
        };

        Ok(Self { title, content })
    }
}

/// `/posts\intro.md` -> `posts/intro.md`
pub fn normalize_content_path(path: &str) -> String {
    path.trim()
        .replace('\\', "/")
        .split('/')
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .collect::<Vec<_>>()
        .join("/")
}

impl PartialEq for Chapter {
    fn eq(&self, other: &Self) -> bool {
        let same_content = match (&self.content, &other.content) {
            (Some(a), Some(b)) => a.url() == b.url(),
            (None, None) => true,
            _ => false,
        };
        self.title == other.title && same_content
    }
}

impl Serialize for Chapter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut chapter = serializer.serialize_struct("Chapter", 2)?;
        chapter.serialize_field("title", &self.title)?;
        chapter.serialize_field("content", &self.content.as_ref().map(|c| c.url()))?;
        chapter.end()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::address::{ContentUrl, DocumentKind, UrlScope};
    use crate::content::{DetachedResolver, FieldModel, RawFields};

    fn setup_content() -> Arc<ContentFields> {
        let mut raw = RawFields::new();
        raw.insert("title".into(), Value::from("Getting Started"));
        let url = ContentUrl::parse(UrlScope::root(), "/setup/", DocumentKind::HtmlDocument).unwrap();
        ContentFields::new(
            "guide/setup.md",
            url,
            raw,
            "",
            Arc::new(FieldModel::builtin_content()),
            Arc::new(DetachedResolver),
        )
    }

    fn lookup(path: &str) -> Option<Arc<ContentFields>> {
        (path == "guide/setup.md").then(setup_content)
    }

    fn entry(pairs: &[(&str, &str)]) -> Value {
        let map: BTreeMap<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect();
        Value::Map(map)
    }

    #[test]
    fn test_titles_fall_back_to_content() {
        let raw = Value::List(vec![
            Value::from("/guide/setup.md"),
            entry(&[("title", "Setup"), ("content", "guide/setup.md")]),
            entry(&[("title", "Appendix")]),
        ]);
        let chapters = Chapter::parse_all(&raw, lookup).unwrap();

        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[0].title.as_deref(), Some("Getting Started"));
        assert_eq!(chapters[1].title.as_deref(), Some("Setup"));
        assert!(chapters[2].content.is_none());
    }

    #[test]
    fn test_missing_content() {
        let raw = Value::List(vec![Value::from("nope.md")]);
        let err = Chapter::parse_all(&raw, lookup).unwrap_err();
        assert!(matches!(err, ContentError::ChapterNotFound(ref path) if path == "nope.md"));
    }

    #[test]
    fn test_invalid_shapes() {
        assert!(matches!(
            Chapter::parse_all(&Value::Int(1), lookup),
            Err(ContentError::Chapters(_))
        ));
        let raw = Value::List(vec![entry(&[])]);
        assert!(matches!(
            Chapter::parse_all(&raw, lookup),
            Err(ContentError::Chapters(_))
        ));
    }

    #[test]
    fn test_normalize_content_path() {
        assert_eq!(normalize_content_path("/a\\b/./c.md"), "a/b/c.md");
    }
}
