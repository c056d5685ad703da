//! Settings sections.
//!
//! | Section          | Purpose                                   |
//! |------------------|-------------------------------------------|
//! | `[dirs]`         | Directory layout of a site                |
//! | `[markers.<id>]` | Marker (tag/category) definitions         |

mod dirs;
mod markers;

pub use dirs::DirsConfig;
pub use markers::MarkerConfig;
