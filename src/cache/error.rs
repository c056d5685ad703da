//! Object cache errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::address::AddressError;
use crate::config::ConfigError;
use crate::content::ContentError;
use crate::site::{SiteError, SiteId};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("site `{0}` is already loaded, use reload")]
    AlreadyLoaded(SiteId),

    #[error("site `{0}` is not loaded")]
    NotLoaded(SiteId),

    #[error("marker `{0}` not found")]
    MarkerNotFound(String),

    #[error("content id `{id}` is used by both `{first}` and `{second}`")]
    DuplicateContentId {
        id: String,
        first: String,
        second: String,
    },

    #[error("url `{url}` is claimed by both `{first}` and `{second}`")]
    DuplicateUrl {
        url: String,
        first: String,
        second: String,
    },

    #[error("marker `{0}` is defined twice")]
    DuplicateMarker(String),

    #[error("unknown marker kind `{0}`, expected single, multiple or hierarchical")]
    UnknownMarkerKind(String),

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("cannot read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Site(#[from] SiteError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Address(#[from] AddressError),
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
