//! Site identifiers and the site registry.
//!
//! A project is a tree of sites: the root site (`::`) and nested sub-sites
//! living under `sites/<name>/` directories. Each site is addressed by a
//! [`SiteId`] and registered in a flat [`SiteRegistry`] arena, parents first.
//!
//! ```text
//! project/               ->  ::
//! project/sites/blog/    ->  blog
//! project/sites/blog/sites/fr/  ->  blog::fr
//! ```

mod error;
mod id;
mod registry;

pub use error::SiteError;
pub use id::{SITE_ID_SEPARATOR, SiteId};
pub use registry::{Site, SiteRegistry};
