//! Content entities and their fields.
//!
//! A markdown file becomes a [`ContentFields`] in four steps:
//!
//! ```text
//! text ─split_front_matter─▶ front matter ─DirectoryLayers─▶ raw fields
//!      ─FieldModel─▶ typed values (lazily, on first get)
//! ```
//!
//! # Module Structure
//!
//! - [`value`]: typed values and literal detection
//! - [`frontmatter`]: `---` / `+++` front matter parsing
//! - [`layer`]: directory-level meta files
//! - [`model`]: field models and their registries
//! - [`marker`]: markers, marks and mark conversion
//! - [`fields`]: [`ContentFields`] and its generated/synthetic variants
//! - [`permalink`]: permalink derivation
//! - [`pagination`], [`chapter`]: the two expanded fields

mod chapter;
mod error;
mod fields;
mod frontmatter;
mod layer;
mod marker;
mod model;
mod pagination;
mod permalink;
mod value;

pub use chapter::{Chapter, normalize_content_path};
pub use error::ContentError;
pub use fields::{
    CHAPTERS_KEY, ContentFields, DetachedResolver, FieldResolver, Fields, GeneratedFields,
    PAGINATION_KEY, SyntheticFields,
};
pub use frontmatter::{parse_toml_fields, split_front_matter};
pub use layer::DirectoryLayers;
pub use marker::{Mark, MarkConverter, Marker, MarkerKind, MarkerRegistry, SettingsMarkerRegistry};
pub use model::{
    CONTENT_MODEL, FieldModel, FieldType, ModelRegistry, StaticModelRegistry, TreeModelRegistry,
};
pub use pagination::{Paginated, PaginationPage, PaginationRequest, paginate};
pub use permalink::derive_permalink;
pub use value::{RawFields, Value};

/// Whether a file is markdown content rather than a static file.
pub fn is_markdown(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
}
