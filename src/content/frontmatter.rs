//! Front matter extraction.
//!
//! Two fenced forms are recognized at the top of a markdown file:
//!
//! ```text
//! ---                      +++
//! title: Hello             title = "Hello"
//! tags: [rust, howto]      tags = ["rust", "howto"]
//! pagination:              [pagination]
//!   query: type == post    query = "type == post"
//!   per_page: 5            per_page = 5
//! ---                      +++
//! ```
//!
//! The `---` form is a small YAML subset: `key: value` lines, nested maps by
//! indentation, `- item` lists and inline `[a, b]` lists. Scalars go through
//! [`Value::from_literal`].

use super::{ContentError, RawFields, Value};

/// Split a markdown file into its parsed front matter and body.
///
/// Files without front matter yield empty fields and the whole text as body.
pub fn split_front_matter<'a>(path: &str, text: &'a str) -> Result<(RawFields, &'a str), ContentError> {
    let Some((fm, body, is_toml)) = detect_front_matter(text) else {
        return Ok((RawFields::new(), text));
    };

    let fields = if is_toml {
        parse_toml_fields(fm)
    } else {
        parse_yaml_like(fm)
    };
    let fields = fields.map_err(|message| ContentError::FrontMatter {
        path: path.to_string(),
        message,
    })?;
    Ok((fields, body))
}

/// Returns `(front matter, body, is_toml)` if found.
fn detect_front_matter(content: &str) -> Option<(&str, &str, bool)> {
    let trimmed = content.trim_start_matches('\u{feff}').trim_start();

    for (fence, is_toml) in [("---", false), ("+++", true)] {
        if trimmed.starts_with(fence)
            && let Some(end) = trimmed[3..].find(&format!("\n{fence}"))
        {
            let fm = trimmed[3..3 + end].trim_matches('\n');
            let rest = &trimmed[3 + end + 4..];
            // Rest of the closing fence line
            let body = rest.split_once('\n').map_or("", |(_, body)| body);
            return Some((fm, body, is_toml));
        }
    }
    None
}

/// Parse a TOML document into raw fields.
pub fn parse_toml_fields(content: &str) -> Result<RawFields, String> {
    let table: toml::Table = toml::from_str(content).map_err(|err| err.message().to_string())?;
    Ok(from_toml_table(table))
}

fn from_toml_table(table: toml::Table) -> RawFields {
    table
        .into_iter()
        .map(|(key, value)| (key, from_toml_value(value)))
        .collect()
}

fn from_toml_value(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::Str(s),
        toml::Value::Integer(n) => Value::Int(n),
        toml::Value::Float(n) => Value::Float(n),
        toml::Value::Boolean(b) => Value::Bool(b),
        // Offset datetimes that do not fit stay strings
        toml::Value::Datetime(dt) => Value::from_literal(&dt.to_string()),
        toml::Value::Array(items) => Value::List(items.into_iter().map(from_toml_value).collect()),
        toml::Value::Table(table) => Value::Map(from_toml_table(table)),
    }
}

type Line<'a> = (usize, &'a str);

fn parse_yaml_like(content: &str) -> Result<RawFields, String> {
    let lines: Vec<Line<'_>> = content
        .lines()
        .filter(|line| {
            let text = line.trim();
            !text.is_empty() && !text.starts_with('#')
        })
        .map(|line| (line.len() - line.trim_start().len(), line.trim()))
        .collect();

    let mut pos = 0;
    let indent = lines.first().map_or(0, |(indent, _)| *indent);
    let fields = parse_map(&lines, &mut pos, indent)?;
    match lines.get(pos) {
        Some((_, text)) => Err(format!("unexpected indentation at `{text}`")),
        None => Ok(fields),
    }
}

fn parse_map(lines: &[Line<'_>], pos: &mut usize, indent: usize) -> Result<RawFields, String> {
    let mut map = RawFields::new();
    while let Some(&(line_indent, text)) = lines.get(*pos) {
        if line_indent != indent {
            break;
        }
        let Some((key, value)) = text.split_once(':') else {
            return Err(format!("expected `key: value`, found `{text}`"));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("missing key in `{text}`"));
        }
        *pos += 1;

        let value = value.trim();
        let parsed = if !value.is_empty() {
            parse_scalar(value)
        } else {
            match lines.get(*pos) {
                Some(&(child, child_text)) if child > indent => {
                    if is_list_item(child_text) {
                        Value::List(parse_list(lines, pos, child))
                    } else {
                        Value::Map(parse_map(lines, pos, child)?)
                    }
                }
                _ => Value::Null,
            }
        };
        map.insert(key.to_string(), parsed);
    }
    Ok(map)
}

fn parse_list(lines: &[Line<'_>], pos: &mut usize, indent: usize) -> Vec<Value> {
    let mut items = Vec::new();
    while let Some(&(line_indent, text)) = lines.get(*pos) {
        if line_indent != indent || !is_list_item(text) {
            break;
        }
        items.push(parse_scalar(text[1..].trim()));
        *pos += 1;
    }
    items
}

fn is_list_item(text: &str) -> bool {
    text == "-" || text.starts_with("- ")
}

/// Scalar or inline `[a, b]` list.
fn parse_scalar(value: &str) -> Value {
    match value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        Some(inner) => Value::List(
            inner
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(Value::from_literal)
                .collect(),
        ),
        None => Value::from_literal(value),
    }
}
