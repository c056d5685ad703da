//! `[markers.<id>]` sections.
//!
//! ```toml
//! [markers.series]
//! kind = "single"
//! title = "Series"
//! ```

use serde::{Deserialize, Serialize};

use crate::content::MarkerKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerConfig {
    pub kind: MarkerKind,
    /// Display title, defaults to the marker id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}
