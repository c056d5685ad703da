//! Address errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// A path component made only of whitespace.
    #[error("invalid address `{input}`: component {index} is only whitespace")]
    InvalidAddressInput { input: String, index: usize },

    /// A lookup-only URL was asked for a concrete path or string form.
    #[error("url `{0}` has no document kind and cannot be materialized")]
    UnspecifiedKind(String),

    #[error("no registered site matches `{0}`")]
    NoMatchingSite(String),

    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
}
