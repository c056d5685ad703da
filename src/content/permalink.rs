//! Local URL paths of markdown contents.
//!
//! | source                 | fields              | permalink         |
//! |------------------------|---------------------|-------------------|
//! | `posts/hello.md`       |                     | `/posts/hello/`   |
//! | `posts/hello.md`       | `slug = "hi"`       | `/posts/hi/`      |
//! | `posts/hello.md`       | `path = "/blog"`    | `/blog/hello/`    |
//! | `posts/index.md`       |                     | `/posts/`         |
//! | any                    | `permalink = "/x/"` | `/x/`             |

use std::path::Path;

use super::{RawFields, Value};
use crate::utils::slug::slugify;

/// Derive the site-local permalink of the content at `rel_path` (relative
/// to the contents directory) from its layered raw fields.
pub fn derive_permalink(rel_path: &str, raw: &RawFields) -> String {
    if let Some(permalink) = text_field(raw, "permalink") {
        return permalink;
    }

    let path = Path::new(rel_path);
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();

    let dir = match text_field(raw, "path") {
        Some(dir) => dir,
        None => path
            .parent()
            .map(|parent| parent.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default(),
    };
    let dir = dir.trim_matches('/');

    let name = match text_field(raw, "slug") {
        Some(slug) => slug,
        None if stem.eq_ignore_ascii_case("index") => String::new(),
        None => slugify(stem),
    };

    let joined: Vec<&str> = [dir, name.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    if joined.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", joined.join("/"))
    }
}

fn text_field(raw: &RawFields, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::Null => None,
        value => Some(value.to_string().trim().to_string()).filter(|s| !s.is_empty()),
    }
}
