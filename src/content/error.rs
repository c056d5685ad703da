//! Content field errors.

use thiserror::Error;

use crate::address::AddressError;
use crate::query::QueryError;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid front matter in `{path}`: {message}")]
    FrontMatter { path: String, message: String },

    #[error("model `{0}` not found")]
    ModelNotFound(String),

    #[error("invalid model `{name}`: {message}")]
    Model { name: String, message: String },

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("cannot paginate `{path}`: {message}")]
    Pagination { path: String, message: String },

    #[error("chapter content `{0}` not found")]
    ChapterNotFound(String),

    #[error("invalid chapters: {0}")]
    Chapters(String),
}
