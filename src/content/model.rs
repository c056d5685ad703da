//! Field models: which fields a content type knows and how to convert them.
//!
//! Models are TOML documents under the models directory:
//!
//! ```toml
//! # metas/models/content.toml
//! [fields]
//! rating = "int"
//! series = "marker:series"
//! ```
//!
//! The builtin `content` model is always available. A user model with the
//! same name extends it; fields the builtin model already defines keep their
//! builtin type. `tags` and `categories` hold marks in every model.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::{ContentError, FieldResolver, Value};
use crate::debug;
use crate::fs::FileTree;
use crate::utils::date::{Date, DateTimeUtc, TimeOfDay};

/// Name of the model every markdown content uses.
pub const CONTENT_MODEL: &str = "content";

/// Fields converted to marks of the marker with the same id, whatever the
/// model declares.
pub const MARKER_FIELDS: [&str; 2] = ["tags", "categories"];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Int,
    Float,
    Bool,
    Date,
    Time,
    DateTime,
    List,
    /// Marks of the named marker.
    Marker(String),
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(marker) = s.strip_prefix("marker:") {
            let marker = marker.trim();
            if marker.is_empty() {
                return Err("marker type needs a marker id, e.g. `marker:tags`".into());
            }
            return Ok(Self::Marker(marker.to_string()));
        }
        Ok(match s.to_ascii_lowercase().as_str() {
            "text" | "string" | "markdown" | "html" => Self::Text,
            "int" | "integer" | "number" => Self::Int,
            "float" => Self::Float,
            "bool" | "boolean" => Self::Bool,
            "date" => Self::Date,
            "time" => Self::Time,
            "datetime" => Self::DateTime,
            "list" => Self::List,
            other => return Err(format!("unknown field type `{other}`")),
        })
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Bool => f.write_str("bool"),
            Self::Date => f.write_str("date"),
            Self::Time => f.write_str("time"),
            Self::DateTime => f.write_str("datetime"),
            Self::List => f.write_str("list"),
            Self::Marker(id) => write!(f, "marker:{id}"),
        }
    }
}

impl FieldType {
    /// Convert a raw value. Values that do not fit the type pass through
    /// unchanged.
    pub fn convert(&self, raw: &Value, resolver: &dyn FieldResolver) -> Value {
        let converted = match (self, raw) {
            (Self::Marker(id), raw) => Some(Value::Marks(resolver.convert_marks(id, raw))),
            (Self::Text, Value::List(_) | Value::Map(_)) => None,
            (Self::Text, Value::Str(_)) => Some(raw.clone()),
            (Self::Text, other) => Some(Value::Str(other.to_string())),

            (Self::Int, Value::Int(_)) => Some(raw.clone()),
            (Self::Int, Value::Float(n)) if n.fract() == 0.0 => Some(Value::Int(*n as i64)),
            (Self::Int, Value::Str(s)) => s.trim().parse().ok().map(Value::Int),

            (Self::Float, Value::Float(_)) => Some(raw.clone()),
            (Self::Float, Value::Int(n)) => Some(Value::Float(*n as f64)),
            (Self::Float, Value::Str(s)) => s.trim().parse().ok().map(Value::Float),

            (Self::Bool, Value::Bool(_)) => Some(raw.clone()),
            (Self::Bool, Value::Str(s)) => match Value::from_literal(s) {
                Value::Bool(b) => Some(Value::Bool(b)),
                _ => None,
            },

            (Self::Date, Value::Date(_)) => Some(raw.clone()),
            (Self::Date, Value::DateTime(dt)) => Some(Value::Date(dt.date())),
            (Self::Date, Value::Str(s)) => Date::parse(s).map(Value::Date),

            (Self::Time, Value::Time(_)) => Some(raw.clone()),
            (Self::Time, Value::Str(s)) => TimeOfDay::parse(s).map(Value::Time),

            (Self::DateTime, Value::DateTime(_)) => Some(raw.clone()),
            (Self::DateTime, Value::Date(d)) => Some(Value::DateTime(d.at_midnight())),
            (Self::DateTime, Value::Str(s)) => DateTimeUtc::parse(s)
                .or_else(|| Date::parse(s).map(Date::at_midnight))
                .map(Value::DateTime),

            (Self::List, Value::List(_)) => Some(raw.clone()),
            (Self::List, Value::Null) => Some(Value::List(Vec::new())),
            (Self::List, other) => Some(Value::List(other.clone().into_sequence())),

            _ => None,
        };

        converted.unwrap_or_else(|| {
            debug!("model"; "`{}` value {} kept as {}", self, raw, raw.type_name());
            raw.clone()
        })
    }
}

/// Recognized fields of one content type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldModel {
    pub name: String,
    fields: BTreeMap<String, FieldType>,
}

impl FieldModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.insert(key.into(), field_type);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldType> {
        if MARKER_FIELDS.contains(&key) {
            return BUILTIN_CONTENT.fields.get(key);
        }
        self.fields.get(key)
    }

    /// `(field, marker id)` of every field holding marks.
    pub fn marker_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        let declared = self
            .fields
            .keys()
            .map(String::as_str)
            .filter(|key| !MARKER_FIELDS.contains(key));
        MARKER_FIELDS
            .into_iter()
            .chain(declared)
            .filter_map(move |key| match self.get(key)? {
                FieldType::Marker(marker_id) => Some((key, marker_id.as_str())),
                _ => None,
            })
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &FieldType)> {
        self.fields.iter()
    }

    /// Builtin model of markdown contents.
    pub fn builtin_content() -> Self {
        BUILTIN_CONTENT.clone()
    }

    /// Parse a model document (`[fields]` table of `name = "type"`).
    pub fn from_toml_str(name: &str, content: &str) -> Result<Self, ContentError> {
        #[derive(Deserialize)]
        struct ModelFile {
            #[serde(default)]
            fields: BTreeMap<String, String>,
        }

        let model_error = |message: String| ContentError::Model {
            name: name.to_string(),
            message,
        };

        let file: ModelFile = toml::from_str(content).map_err(|err| model_error(err.to_string()))?;
        let mut model = Self::new(name);
        for (key, type_name) in file.fields {
            let field_type = type_name
                .parse()
                .map_err(|err| model_error(format!("field `{key}`: {err}")))?;
            model.fields.insert(key, field_type);
        }
        Ok(model)
    }

    /// Add fields from `other` that `self` does not define yet.
    pub fn extend_with(&mut self, other: FieldModel) {
        for (key, field_type) in other.fields {
            if self.fields.contains_key(&key) {
                debug!("model"; "`{}.{}` is builtin, user type ignored", self.name, key);
                continue;
            }
            self.fields.insert(key, field_type);
        }
    }
}

static BUILTIN_CONTENT: LazyLock<FieldModel> = LazyLock::new(|| {
    FieldModel::new(CONTENT_MODEL)
        .with_field("id", FieldType::Text)
        .with_field("title", FieldType::Text)
        .with_field("type", FieldType::Text)
        .with_field("slug", FieldType::Text)
        .with_field("path", FieldType::Text)
        .with_field("permalink", FieldType::Text)
        .with_field("summary", FieldType::Text)
        .with_field("created", FieldType::DateTime)
        .with_field("updated", FieldType::DateTime)
        .with_field("draft", FieldType::Bool)
        .with_field("tags", FieldType::Marker("tags".into()))
        .with_field("categories", FieldType::Marker("categories".into()))
});

/// Source of field models.
pub trait ModelRegistry: Send + Sync {
    fn get_model(&self, name: &str) -> Result<Arc<FieldModel>, ContentError>;
}

/// Models held in memory.
#[derive(Debug, Default)]
pub struct StaticModelRegistry {
    models: FxHashMap<String, Arc<FieldModel>>,
}

impl StaticModelRegistry {
    /// Registry with only the builtin `content` model.
    pub fn with_builtin() -> Self {
        let mut registry = Self::default();
        registry.insert(FieldModel::builtin_content());
        registry
    }

    pub fn insert(&mut self, model: FieldModel) {
        self.models.insert(model.name.clone(), Arc::new(model));
    }
}

impl ModelRegistry for StaticModelRegistry {
    fn get_model(&self, name: &str) -> Result<Arc<FieldModel>, ContentError> {
        self.models
            .get(name)
            .cloned()
            .ok_or_else(|| ContentError::ModelNotFound(name.to_string()))
    }
}

/// Models read from `<models dir>/<name>.toml` through a [`FileTree`].
pub struct TreeModelRegistry {
    tree: Arc<dyn FileTree>,
    dir: PathBuf,
    loaded: RwLock<FxHashMap<String, Arc<FieldModel>>>,
}

impl TreeModelRegistry {
    pub fn new(tree: Arc<dyn FileTree>, dir: impl Into<PathBuf>) -> Self {
        Self {
            tree,
            dir: dir.into(),
            loaded: RwLock::new(FxHashMap::default()),
        }
    }

    fn read_model(&self, name: &str) -> Result<Option<FieldModel>, ContentError> {
        let path = self.dir.join(format!("{name}.toml"));
        if !self.tree.exists(&path) {
            return Ok(None);
        }
        let text = self.tree.read_text(&path).map_err(|err| ContentError::Model {
            name: name.to_string(),
            message: format!("cannot read `{}`: {err}", path.display()),
        })?;
        FieldModel::from_toml_str(name, &text).map(Some)
    }
}

impl ModelRegistry for TreeModelRegistry {
    fn get_model(&self, name: &str) -> Result<Arc<FieldModel>, ContentError> {
        if let Some(model) = self.loaded.read().get(name) {
            return Ok(model.clone());
        }

        let user = self.read_model(name)?;
        let model = match (name == CONTENT_MODEL, user) {
            (true, user) => {
                let mut builtin = FieldModel::builtin_content();
                if let Some(user) = user {
                    builtin.extend_with(user);
                }
                builtin
            }
            (false, Some(user)) => user,
            (false, None) => return Err(ContentError::ModelNotFound(name.to_string())),
        };

        let model = Arc::new(model);
        Ok(self
            .loaded
            .write()
            .entry(name.to_string())
            .or_insert(model)
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::DetachedResolver;
    use crate::fs::MemoryFileTree;

    #[test]
    fn test_field_type_parse() {
        assert_eq!("datetime".parse::<FieldType>(), Ok(FieldType::DateTime));
        assert_eq!(
            "marker:series".parse::<FieldType>(),
            Ok(FieldType::Marker("series".into()))
        );
        assert!("marker:".parse::<FieldType>().is_err());
        assert!("blob".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_convert_types() {
        let resolver = DetachedResolver;
        assert_eq!(
            FieldType::DateTime.convert(&Value::Date(Date::new(2024, 1, 2)), &resolver),
            Value::DateTime(DateTimeUtc::new(2024, 1, 2, 0, 0, 0))
        );
        assert_eq!(
            FieldType::Int.convert(&Value::from("12"), &resolver),
            Value::Int(12)
        );
        assert_eq!(
            FieldType::Text.convert(&Value::Int(12), &resolver),
            Value::from("12")
        );
        assert_eq!(
            FieldType::List.convert(&Value::from("a, b"), &resolver),
            Value::List(vec![Value::from("a"), Value::from("b")])
        );
    }

    #[test]
    fn test_convert_mismatch_keeps_raw() {
        let resolver = DetachedResolver;
        let raw = Value::from("not a date");
        assert_eq!(FieldType::Date.convert(&raw, &resolver), raw);
    }

    #[test]
    fn test_convert_marker() {
        let resolver = DetachedResolver;
        let value = FieldType::Marker("tags".into()).convert(&Value::from("a, b"), &resolver);
        match value {
            Value::Marks(marks) => assert_eq!(marks.len(), 2),
            other => panic!("expected marks, got {other:?}"),
        }
    }

    #[test]
    fn test_model_from_toml() {
        let model = FieldModel::from_toml_str("book", "[fields]\nisbn = \"text\"\npages = \"int\"")
            .unwrap();
        assert_eq!(model.get("pages"), Some(&FieldType::Int));

        let err = FieldModel::from_toml_str("book", "[fields]\nx = \"blob\"").unwrap_err();
        assert!(matches!(err, ContentError::Model { .. }));
    }

    #[test]
    fn test_marker_fields_in_every_model() {
        let book = FieldModel::from_toml_str(
            "book",
            "[fields]\npages = \"int\"\ntags = \"text\"\nseries = \"marker:series\"",
        )
        .unwrap();
        assert_eq!(book.get("tags"), Some(&FieldType::Marker("tags".into())));
        assert_eq!(
            book.get("categories"),
            Some(&FieldType::Marker("categories".into()))
        );

        let markers: Vec<_> = book.marker_fields().collect();
        assert_eq!(
            markers,
            [("tags", "tags"), ("categories", "categories"), ("series", "series")]
        );
    }

    #[test]
    fn test_static_registry() {
        let registry = StaticModelRegistry::with_builtin();
        assert!(registry.get_model(CONTENT_MODEL).is_ok());
        assert!(matches!(
            registry.get_model("missing"),
            Err(ContentError::ModelNotFound(_))
        ));
    }

    #[test]
    fn test_tree_registry_user_model_only_adds() {
        let tree = MemoryFileTree::new()
            .with_file(
                "metas/models/content.toml",
                "[fields]\ncreated = \"text\"\nrating = \"int\"",
            )
            .with_file("metas/models/book.toml", "[fields]\npages = \"int\"");
        let registry = TreeModelRegistry::new(Arc::new(tree), "metas/models");

        let content = registry.get_model(CONTENT_MODEL).unwrap();
        assert_eq!(content.get("created"), Some(&FieldType::DateTime));
        assert_eq!(content.get("rating"), Some(&FieldType::Int));

        let book = registry.get_model("book").unwrap();
        assert_eq!(book.get("pages"), Some(&FieldType::Int));
        assert!(Arc::ptr_eq(&book, &registry.get_model("book").unwrap()));

        assert!(matches!(
            registry.get_model("missing"),
            Err(ContentError::ModelNotFound(_))
        ));
    }
}
