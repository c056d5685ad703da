//! Content addressing - canonical paths and site-scoped URLs.
//!
//! Everything that can be looked up by location goes through this module:
//!
//! ```text
//! "/a/./b/../c/"        --PathAddress::parse-->  ["", "a", "c", ""]
//! PathAddress + kind    --ContentUrl::new----->  site-scoped, hashable URL
//! "http://h/blog/x/_/2" --RequestParser------->  (blog, ["x"], ["2"])
//! ```
//!
//! # Module Structure
//!
//! - [`path`]: component normalization and boundary-merging joins
//! - [`kind`]: document kinds deciding slash and index-file rules
//! - [`url`]: [`ContentUrl`], the site-scoped address of a content entity
//! - [`request`]: splitting a requested URL into site, local and special parts

mod error;
mod kind;
mod path;
mod request;
mod url;

pub use error::AddressError;
pub use kind::DocumentKind;
pub use path::{PathAddress, normalize_components};
pub use request::{RequestParser, RequestTarget, parse_request};
pub use url::{ContentUrl, UrlScope};
