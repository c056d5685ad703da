//! Typed field values.
//!
//! Raw front matter and query operands share one value type. Scalars are
//! detected from text by [`Value::from_literal`]; richer values (marks,
//! pagination pages, chapters, URLs) only appear after model conversion.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::{Chapter, Mark, PaginationPage};
use crate::address::ContentUrl;
use crate::utils::date::{Date, DateTimeUtc, TimeOfDay};

/// Field mapping before conversion.
pub type RawFields = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Date(Date),
    Time(TimeOfDay),
    DateTime(DateTimeUtc),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Marks(Vec<Mark>),
    Url(ContentUrl),
    Page(Arc<PaginationPage>),
    Chapters(Arc<[Chapter]>),
}

impl Value {
    /// Detect a scalar from its text form.
    ///
    /// Tried in order: quoted string, bool, null, int, float, datetime, date,
    /// time. Anything else stays a string.
    pub fn from_literal(text: &str) -> Self {
        let s = text.trim();

        if s.len() >= 2
            && let Some(inner) = s
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
                .or_else(|| s.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')))
        {
            return Self::Str(inner.to_string());
        }

        if s.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if s.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        if s.eq_ignore_ascii_case("null") || s == "~" {
            return Self::Null;
        }

        if let Ok(n) = s.parse::<i64>() {
            return Self::Int(n);
        }
        if s.bytes().any(|b| b.is_ascii_digit())
            && let Ok(n) = s.parse::<f64>()
            && n.is_finite()
        {
            return Self::Float(n);
        }

        if let Some(dt) = DateTimeUtc::parse(s) {
            return Self::DateTime(dt);
        }
        if let Some(date) = Date::parse(s) {
            return Self::Date(date);
        }
        if let Some(time) = TimeOfDay::parse(s) {
            return Self::Time(time);
        }

        Self::Str(s.to_string())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::DateTime(_) => "datetime",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Marks(_) => "marks",
            Self::Url(_) => "url",
            Self::Page(_) => "pagination",
            Self::Chapters(_) => "chapters",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Walk nested maps: `author.name` on `{author: {name: ..}}`.
    pub fn lookup<'a, I>(&self, path: I) -> Option<&Value>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut current = self;
        for key in path {
            current = current.as_map()?.get(key)?;
        }
        Some(current)
    }

    /// Numeric view for int/float comparisons.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Equality across compatible types.
    ///
    /// Ints and floats compare numerically, a date equals a datetime on the
    /// same day. Values of unrelated types are never equal.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Int(_) | Self::Float(_), Self::Int(_) | Self::Float(_)) => {
                self.as_f64() == other.as_f64()
            }
            (Self::Date(a), Self::DateTime(b)) | (Self::DateTime(b), Self::Date(a)) => {
                *a == b.date()
            }
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            (Self::Marks(marks), Self::Str(s)) | (Self::Str(s), Self::Marks(marks)) => {
                matches!(marks.as_slice(), [mark] if mark.matches(s))
            }
            _ => self == other,
        }
    }

    /// Ordering across compatible types, `None` when unrelated.
    pub fn loose_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Int(_) | Self::Float(_), Self::Int(_) | Self::Float(_)) => {
                self.as_f64()?.partial_cmp(&other.as_f64()?)
            }
            (Self::Str(a), Self::Str(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::Time(a), Self::Time(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::DateTime(b)) => Some(a.cmp(&b.date())),
            (Self::DateTime(a), Self::Date(b)) => Some(a.date().cmp(b)),
            _ => None,
        }
    }

    /// Membership of `needle` in `self`, `None` when `self` is no collection.
    ///
    /// Lists test element equality, marks match by id or title, strings test
    /// for a substring and maps for a key.
    pub fn contains(&self, needle: &Value) -> Option<bool> {
        match self {
            Self::List(items) => Some(items.iter().any(|item| item.loose_eq(needle))),
            Self::Marks(marks) => {
                let text = needle.to_string();
                Some(marks.iter().any(|mark| mark.matches(&text)))
            }
            Self::Str(s) => needle.as_str().map(|n| s.contains(n)),
            Self::Map(map) => needle.as_str().map(|key| map.contains_key(key)),
            _ => None,
        }
    }

    /// Right operand of `in`: lists as they are, strings split on commas,
    /// any other scalar as a single element.
    pub fn into_sequence(self) -> Vec<Value> {
        match self {
            Self::List(items) => items,
            Self::Str(s) => s
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(Self::from_literal)
                .collect(),
            other => vec![other],
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{d}"),
            Self::Time(t) => write!(f, "{t}"),
            Self::DateTime(dt) => write!(f, "{dt}"),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                f.write_str(&parts.join(", "))
            }
            Self::Map(map) => {
                let parts: Vec<String> = map.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Self::Marks(marks) => {
                let titles: Vec<&str> = marks.iter().map(|m| m.title.as_str()).collect();
                f.write_str(&titles.join(", "))
            }
            Self::Url(url) => write!(f, "{url}"),
            Self::Page(page) => write!(f, "page {} of {}", page.position, page.total),
            Self::Chapters(chapters) => write!(f, "{} chapters", chapters.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(n) => serializer.serialize_f64(*n),
            Self::Str(s) => serializer.serialize_str(s),
            Self::Date(_) | Self::Time(_) | Self::DateTime(_) | Self::Url(_) => {
                serializer.collect_str(self)
            }
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
            Self::Marks(marks) => marks.serialize(serializer),
            Self::Page(page) => page.serialize(serializer),
            Self::Chapters(chapters) => {
                let mut seq = serializer.serialize_seq(Some(chapters.len()))?;
                for chapter in chapters.iter() {
                    seq.serialize_element(chapter)?;
                }
                seq.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_literal_scalars() {
        assert_eq!(Value::from_literal("42"), Value::Int(42));
        assert_eq!(Value::from_literal("-7"), Value::Int(-7));
        assert_eq!(Value::from_literal("3.5"), Value::Float(3.5));
        assert_eq!(Value::from_literal("TRUE"), Value::Bool(true));
        assert_eq!(Value::from_literal("~"), Value::Null);
        assert_eq!(Value::from_literal("  post "), Value::from("post"));
        assert_eq!(Value::from_literal("\"42\""), Value::from("42"));
        assert_eq!(Value::from_literal("inf"), Value::from("inf"));
    }

    #[test]
    fn test_from_literal_dates() {
        assert_eq!(
            Value::from_literal("2013-2-1"),
            Value::Date(Date::new(2013, 2, 1))
        );
        assert_eq!(
            Value::from_literal("11:24 PM"),
            Value::Time(TimeOfDay::new(23, 24, 0))
        );
        assert_eq!(
            Value::from_literal("1023-12-12     11:33:43 am"),
            Value::DateTime(DateTimeUtc::new(1023, 12, 12, 11, 33, 43))
        );
        assert_eq!(
            Value::from_literal("tag 1, tag 2"),
            Value::from("tag 1, tag 2")
        );
    }

    #[test]
    fn test_loose_eq_numeric_and_dates() {
        assert!(Value::Int(2).loose_eq(&Value::Float(2.0)));
        assert!(!Value::Int(2).loose_eq(&Value::from("2")));
        let date = Value::Date(Date::new(2024, 5, 1));
        let dt = Value::DateTime(DateTimeUtc::new(2024, 5, 1, 10, 0, 0));
        assert!(date.loose_eq(&dt));
        assert!(dt.loose_eq(&date));
    }

    #[test]
    fn test_loose_cmp() {
        assert_eq!(Value::Int(1).loose_cmp(&Value::Float(1.5)), Some(Ordering::Less));
        assert_eq!(Value::from("b").loose_cmp(&Value::from("a")), Some(Ordering::Greater));
        assert_eq!(Value::Int(1).loose_cmp(&Value::from("a")), None);
        let date = Value::Date(Date::new(2024, 5, 2));
        let dt = Value::DateTime(DateTimeUtc::new(2024, 5, 1, 23, 0, 0));
        assert_eq!(date.loose_cmp(&dt), Some(Ordering::Greater));
    }

    #[test]
    fn test_contains() {
        let list = Value::List(vec![Value::Int(1), Value::from("x")]);
        assert_eq!(list.contains(&Value::Float(1.0)), Some(true));
        assert_eq!(list.contains(&Value::from("y")), Some(false));
        assert_eq!(Value::from("hello world").contains(&Value::from("lo w")), Some(true));
        assert_eq!(Value::Int(5).contains(&Value::Int(5)), None);

        let marks = Value::Marks(vec![Mark::new("How To")]);
        assert_eq!(marks.contains(&Value::from("how-to")), Some(true));
        assert_eq!(marks.contains(&Value::from("how to")), Some(true));
        assert_eq!(marks.contains(&Value::from("howto")), Some(false));
    }

    #[test]
    fn test_into_sequence() {
        assert_eq!(
            Value::from("a, 2 ,b").into_sequence(),
            vec![Value::from("a"), Value::Int(2), Value::from("b")]
        );
        assert_eq!(Value::Int(3).into_sequence(), vec![Value::Int(3)]);
    }

    #[test]
    fn test_lookup_nested() {
        let mut inner = BTreeMap::new();
        inner.insert("name".to_string(), Value::from("Ada"));
        let mut outer = BTreeMap::new();
        outer.insert("author".to_string(), Value::Map(inner));
        let value = Value::Map(outer);

        assert_eq!(value.lookup(["author", "name"]), Some(&Value::from("Ada")));
        assert_eq!(value.lookup(["author", "mail"]), None);
    }

    #[test]
    fn test_serialize_json() {
        let value = Value::List(vec![
            Value::Int(1),
            Value::Date(Date::new(2024, 1, 2)),
            Value::Null,
        ]);
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"[1,"2024-01-02",null]"#
        );
    }
}
