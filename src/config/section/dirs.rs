//! `[dirs]` section.
//!
//! ```toml
//! [dirs]
//! contents = "contents"          # Content files (markdown + static)
//! models = "metas/models"        # Field model definitions
//! subsites = "sites"             # Nested sites
//! dir_meta_file_name = "_meta.toml"
//! ```

use serde::{Deserialize, Serialize};

/// Directory layout of a site, relative to the site root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirsConfig {
    pub contents: String,
    pub models: String,
    pub subsites: String,
    /// Per-directory override file merged into every content below it.
    pub dir_meta_file_name: String,
}

impl Default for DirsConfig {
    fn default() -> Self {
        Self {
            contents: "contents".into(),
            models: "metas/models".into(),
            subsites: "sites".into(),
            dir_meta_file_name: "_meta.toml".into(),
        }
    }
}
