//! Content query language.
//!
//! ```text
//! type == post & tags contains howto ; sort created desc
//! ```
//!
//! - [`parser`]: text to [`Section`]s and [`SortKey`]s
//! - [`op`]: comparison operators
//! - [`eval`]: sequential filtering and sorting over [`Fields`](crate::content::Fields)

mod error;
mod eval;
mod op;
mod parser;

pub use error::QueryError;
pub use eval::matches;
pub use op::Operator;
pub use parser::{Connector, Direction, Query, Section, SortKey};
