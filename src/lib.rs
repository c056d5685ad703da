//! synamic - content addressing, field layering and querying for
//! multi-site static site projects.
//!
//! # Module Structure
//!
//! ```text
//! src/
//! ├── address/   # PathAddress, ContentUrl, request splitting
//! ├── site/      # SiteId and the site registry
//! ├── config/    # SiteSettings (synamic.toml)
//! ├── fs/        # FileTree: local and in-memory file access
//! ├── content/   # values, models, markers, ContentFields, pagination
//! ├── query/     # the query language
//! ├── cache/     # ObjectCache: per-site load lifecycle and lookups
//! ├── cli/       # command-line front-end
//! ├── logger.rs  # log!/debug! macros
//! └── utils/     # dates, slugs, plurals
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use synamic::cache::ObjectCache;
//! use synamic::content::Fields;
//! use synamic::fs::LocalFileTree;
//! use synamic::site::SiteId;
//!
//! # fn main() -> Result<(), synamic::cache::CacheError> {
//! let mut cache = ObjectCache::open(Arc::new(LocalFileTree::new("my-site")))?;
//! cache.load(&SiteId::root())?;
//! for post in cache.query(&SiteId::root(), "type == post ; sort created desc")? {
//!     println!("{} -> {}", post.url(), post.path());
//! }
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod cache;
pub mod cli;
pub mod config;
pub mod content;
pub mod fs;
pub mod logger;
pub mod query;
pub mod site;
pub mod utils;

pub use cache::{CacheError, ObjectCache};
