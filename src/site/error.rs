//! Site tree errors.

use thiserror::Error;

use super::SiteId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiteError {
    #[error("invalid site id `{0}`: components cannot contain whitespace")]
    InvalidSiteId(String),

    #[error("site `{child}` cannot be added before its parent `{parent}`")]
    ParentMissing { child: SiteId, parent: SiteId },

    #[error("site `{0}` is already registered")]
    DuplicateSite(SiteId),

    #[error("site `{0}` not found")]
    SiteNotFound(SiteId),
}
