//! Site settings from `synamic.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [dirs], [markers.<id>]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # settings file lookup
//! └── mod.rs         # SiteSettings (this file)
//! ```
//!
//! # Example
//!
//! ```toml
//! pagination_per_page = 10
//! host_base_path = "/"
//! host_scheme = "https"
//! hostname = "example.com"
//! index_file_name = "index.html"
//! url_partition_comp = "_"
//!
//! [dirs]
//! contents = "contents"
//!
//! [markers.series]
//! kind = "single"
//! ```
//!
//! Every key is optional. A sub-site's settings are layered over its
//! parent's, so a sub-site without a settings file inherits everything.

pub mod section;
pub mod types;
mod util;

pub use section::{DirsConfig, MarkerConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};
pub use util::find_settings_file;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::address::PathAddress;

/// Settings file name at every site root.
pub const SETTINGS_FILE_NAME: &str = "synamic.toml";

/// Storage backend of the object cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    File,
    /// Reserved, loading with it fails.
    Database,
}

/// Settings of one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub pagination_per_page: usize,
    pub host_base_path: String,
    pub host_scheme: String,
    pub hostname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_port: Option<u16>,
    pub index_file_name: String,
    /// Path component separating a content URL from its pagination segments.
    pub url_partition_comp: String,
    pub backend: Backend,
    pub dirs: DirsConfig,
    pub markers: BTreeMap<String, MarkerConfig>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            pagination_per_page: 10,
            host_base_path: "/".into(),
            host_scheme: "http".into(),
            hostname: "localhost".into(),
            host_port: None,
            index_file_name: "index.html".into(),
            url_partition_comp: "_".into(),
            backend: Backend::File,
            dirs: DirsConfig::default(),
            markers: BTreeMap::new(),
        }
    }
}

mod fields {
    use super::FieldPath;

    pub const PER_PAGE: FieldPath = FieldPath::new("pagination_per_page");
    pub const BASE_PATH: FieldPath = FieldPath::new("host_base_path");
    pub const SCHEME: FieldPath = FieldPath::new("host_scheme");
    pub const HOSTNAME: FieldPath = FieldPath::new("hostname");
    pub const INDEX_FILE: FieldPath = FieldPath::new("index_file_name");
    pub const PARTITION: FieldPath = FieldPath::new("url_partition_comp");
    pub const CONTENTS_DIR: FieldPath = FieldPath::new("dirs.contents");
    pub const SUBSITES_DIR: FieldPath = FieldPath::new("dirs.subsites");
    pub const DIR_META: FieldPath = FieldPath::new("dirs.dir_meta_file_name");
}

impl SiteSettings {
    /// Parse and validate a settings document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::default().inherit(content)
    }

    /// Load a settings file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_toml_str(&content)
    }

    /// Layer a child settings document over `self`.
    ///
    /// Tables merge key by key, everything else in the child replaces the
    /// parent's value.
    pub fn inherit(&self, content: &str) -> Result<Self, ConfigError> {
        let overlay: toml::Table = toml::from_str(content)?;
        let mut base = match toml::Value::try_from(self) {
            Ok(toml::Value::Table(table)) => table,
            Ok(_) => toml::Table::new(),
            Err(err) => return Err(ConfigError::Validation(err.to_string())),
        };
        merge_tables(&mut base, overlay);

        let settings: Self = toml::Value::Table(base).try_into()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check values the address and query layers rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        if self.pagination_per_page == 0 {
            diag.error(fields::PER_PAGE, "must be greater than 0");
        }

        let partition = &self.url_partition_comp;
        if partition.is_empty() {
            diag.error(fields::PARTITION, "cannot be empty");
        } else if partition.contains(['/', '\\']) || partition.chars().any(char::is_whitespace) {
            diag.error_with_hint(
                fields::PARTITION,
                format!("`{partition}` must be a single path component"),
                "remove slashes and whitespace, e.g. `_`",
            );
        }

        if !is_plain_file_name(&self.index_file_name) {
            diag.error_with_hint(
                fields::INDEX_FILE,
                format!("`{}` is not a plain file name", self.index_file_name),
                "use a name like `index.html`",
            );
        }

        if self.host_scheme.trim().is_empty() {
            diag.error(fields::SCHEME, "cannot be empty");
        }
        if self.hostname.trim().is_empty() {
            diag.error(fields::HOSTNAME, "cannot be empty");
        }
        if let Err(err) = PathAddress::parse(&self.host_base_path) {
            diag.error(fields::BASE_PATH, err.to_string());
        }

        if self.dirs.contents.trim().is_empty() {
            diag.error(fields::CONTENTS_DIR, "cannot be empty");
        }
        if !is_plain_file_name(&self.dirs.subsites) {
            diag.error(fields::SUBSITES_DIR, "must be a single directory name");
        }
        if !is_plain_file_name(&self.dirs.dir_meta_file_name) {
            diag.error(fields::DIR_META, "must be a plain file name");
        }

        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                merge_tables(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}
