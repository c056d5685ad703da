//! Query command implementation.
//!
//! Loads one site, filters its contents and prints them as a JSON array:
//!
//! ```json
//! [{"path": "posts/a.md", "url": "/posts/a/", "title": "A", "tags": [...]}]
//! ```

use std::path::Path;

use anyhow::{Result, bail};
use serde_json::{Map, Value as JsonValue};

use super::QueryArgs;
use super::common::{load_site, print_json};
use crate::cache::CacheError;
use crate::content::{ContentError, ContentFields, Fields};
use crate::debug;
use crate::utils::plural_count;

/// Execute query command
pub fn run_query(root: &Path, args: &QueryArgs) -> Result<()> {
    let site = args.site.site_id();
    let cache = load_site(root, &site)?;

    let contents = match cache.query(&site, &args.text) {
        Ok(contents) => contents,
        Err(CacheError::Content(ContentError::Query(err))) => {
            eprintln!("{}", err.render_diagnostic());
            bail!("invalid query: {err}");
        }
        Err(err) => return Err(err.into()),
    };
    debug!("query"; "{} matched in site {}", plural_count(contents.len(), "content"), site);

    let output = contents
        .iter()
        .map(|content| content_json(content, args.fields.as_deref()))
        .collect::<Result<Vec<_>>>()?;
    print_json(&output, args.pretty)
}

/// One content as a JSON object, `path` and `url` first.
///
/// Without `fields` every key of the content is included; requested fields
/// the content lacks are `null`.
pub fn content_json(content: &ContentFields, fields: Option<&[String]>) -> Result<JsonValue> {
    let mut obj = Map::new();
    obj.insert("path".to_string(), JsonValue::String(content.path().to_string()));
    obj.insert("url".to_string(), JsonValue::String(content.url().to_string()));

    let keys = match fields {
        Some(fields) => fields.to_vec(),
        None => content.keys(),
    };
    for key in keys {
        let value = match content.get(&key)? {
            Some(value) => serde_json::to_value(&value)?,
            None => JsonValue::Null,
        };
        obj.insert(key, value);
    }

    Ok(JsonValue::Object(obj))
}
