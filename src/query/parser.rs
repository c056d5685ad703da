//! Query text to sections.
//!
//! ```text
//! type == post & tags contains howto | draft == true ; sort created desc
//! └─section───┘└┬┘└─section────────┘ └─section─────┘   └─sort clause──┘
//!            connector
//! ```
//!
//! A value runs up to the next unescaped `&`, `|` or `;`. Inside a value,
//! `\&`, `\|`, `\;` and `\\` stand for the literal character.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::{Operator, QueryError};
use crate::content::Value;

static FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connector {
    And,
    Or,
}

/// One `field op value` predicate and the connector that follows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub field: String,
    pub op: Operator,
    pub value: Value,
    /// Value text after unescaping, before literal detection.
    pub raw: String,
    /// `None` on the last section.
    pub connector: Option<Connector>,
}

impl Section {
    /// `author.name` -> `["author", "name"]`
    pub fn field_path(&self) -> impl Iterator<Item = &str> {
        self.field.split('.')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    pub field: String,
    pub direction: Direction,
}

impl SortKey {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// A parsed query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub sections: Vec<Section>,
    /// Empty means newest `created` first.
    pub sort: Vec<SortKey>,
}

impl Query {
    pub fn parse(text: &str) -> Result<Self, QueryError> {
        Parser::new(text).parse()
    }

    /// Matches every content.
    pub fn all() -> Self {
        Self {
            sections: Vec::new(),
            sort: Vec::new(),
        }
    }
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    /// End of the predicate part (start of `;` or end of text).
    end: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            end: find_unescaped(text, |c| c == ';').unwrap_or(text.len()),
        }
    }

    fn parse(mut self) -> Result<Query, QueryError> {
        let sections = self.parse_sections()?;
        let sort = match self.text.get(self.end..) {
            Some(clause) if !clause.is_empty() => self.parse_sort(self.end + 1)?,
            _ => Vec::new(),
        };
        Ok(Query { sections, sort })
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> QueryError {
        QueryError::syntax(self.text, offset, message)
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..self.end]
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn parse_sections(&mut self) -> Result<Vec<Section>, QueryError> {
        let mut sections = Vec::new();
        self.skip_ws();
        if self.pos == self.end {
            return Ok(sections);
        }

        loop {
            self.skip_ws();
            let field = self.expect_field()?;
            self.skip_ws();
            let op = self.expect_operator()?;
            self.skip_ws();
            let raw = self.expect_value()?;

            let connector = match self.rest().chars().next() {
                Some('&') => Some(Connector::And),
                Some('|') => Some(Connector::Or),
                _ => None,
            };
            sections.push(Section {
                field,
                op,
                value: Value::from_literal(&raw),
                raw,
                connector,
            });

            if connector.is_none() {
                return Ok(sections);
            }
            self.pos += 1;
        }
    }

    fn expect_field(&mut self) -> Result<String, QueryError> {
        let Some(found) = FIELD.find(self.rest()) else {
            return Err(self.error(self.pos, "expected a field name"));
        };
        self.pos += found.end();
        Ok(found.as_str().to_string())
    }

    fn expect_operator(&mut self) -> Result<Operator, QueryError> {
        let op = Operator::lex(self.rest()).ok_or_else(|| self.error(self.pos, "expected an operator"))?;
        self.pos += op.symbol().len();
        Ok(op)
    }

    /// Unescaped, trimmed value up to the next connector.
    fn expect_value(&mut self) -> Result<String, QueryError> {
        let rest = self.rest();
        let len = find_unescaped(rest, |c| c == '&' || c == '|').unwrap_or(rest.len());
        let value = unescape(&rest[..len]).trim().to_string();
        if value.is_empty() {
            return Err(self.error(self.pos, "expected a value"));
        }
        self.pos += len;
        Ok(value)
    }

    /// `sort created desc, title`
    fn parse_sort(&self, start: usize) -> Result<Vec<SortKey>, QueryError> {
        let clause = &self.text[start..];
        let body = clause.trim_start();
        let mut offset = start + clause.len() - body.len();

        let Some(keys) = body.strip_prefix("sort").filter(|k| k.is_empty() || k.starts_with(char::is_whitespace))
        else {
            return Err(self.error(offset, "expected `sort`"));
        };
        offset += "sort".len();

        let mut sort = Vec::new();
        for part in keys.split(',') {
            let lead = part.len() - part.trim_start().len();
            let mut words = part.split_whitespace();
            let Some(field) = words.next() else {
                return Err(self.error(offset + lead, "expected a sort field"));
            };
            if FIELD.find(field).is_none_or(|m| m.end() != field.len()) {
                return Err(self.error(offset + lead, format!("invalid sort field `{field}`")));
            }
            let direction = match words.next().map(str::to_ascii_lowercase).as_deref() {
                None | Some("asc") => Direction::Asc,
                Some("desc") => Direction::Desc,
                Some(other) => {
                    return Err(self.error(offset + lead, format!("unknown sort direction `{other}`")));
                }
            };
            if let Some(extra) = words.next() {
                return Err(self.error(offset + lead, format!("unexpected `{extra}`")));
            }
            sort.push(SortKey::new(field, direction));
            offset += part.len() + 1;
        }
        Ok(sort)
    }
}

/// Byte index of the first unescaped char matching `pred`.
fn find_unescaped(text: &str, pred: impl Fn(char) -> bool) -> Option<usize> {
    let mut escaped = false;
    for (idx, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if pred(c) {
            return Some(idx);
        }
    }
    None
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
            && matches!(next, '&' | '|' | ';' | '\\')
        {
            out.push(next);
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date::{Date, DateTimeUtc, TimeOfDay};

    #[test]
    fn test_sections_and_connectors() {
        let query = Query::parse("type == post & tags contains howto | draft != true").unwrap();
        let shape: Vec<_> = query
            .sections
            .iter()
            .map(|s| (s.field.as_str(), s.op, s.connector))
            .collect();
        assert_eq!(
            shape,
            [
                ("type", Operator::Eq, Some(Connector::And)),
                ("tags", Operator::Contains, Some(Connector::Or)),
                ("draft", Operator::NotEq, None),
            ]
        );
        assert_eq!(query.sections[2].value, Value::Bool(true));
        assert!(query.sort.is_empty());
    }

    #[test]
    fn test_values_keep_spaces_and_detect_literals() {
        let text = "  x > 1 | time > 12:24     AM | date == 2013-2-1 | dt < 1023-12-12     11:33:43 am \
                    | d in ~hh        & m contains tag 1, tag 2 & n !in go sfsdfsdf";
        let query = Query::parse(text).unwrap();
        let values: Vec<_> = query.sections.iter().map(|s| s.value.clone()).collect();
        assert_eq!(
            values,
            [
                Value::Int(1),
                Value::Time(TimeOfDay::new(0, 24, 0)),
                Value::Date(Date::new(2013, 2, 1)),
                Value::DateTime(DateTimeUtc::new(1023, 12, 12, 11, 33, 43)),
                Value::from("~hh"),
                Value::from("tag 1, tag 2"),
                Value::from("go sfsdfsdf"),
            ]
        );
    }

    #[test]
    fn test_escapes() {
        let query = Query::parse(r"title == Tom \& Jerry \| \\ \; end").unwrap();
        assert_eq!(query.sections.len(), 1);
        assert_eq!(query.sections[0].raw, r"Tom & Jerry | \ ; end");
    }

    #[test]
    fn test_dotted_field() {
        let query = Query::parse("author.name == Ada").unwrap();
        let path: Vec<_> = query.sections[0].field_path().collect();
        assert_eq!(path, ["author", "name"]);
    }

    #[test]
    fn test_sort_clause() {
        let query = Query::parse("type == post ; sort created desc, title").unwrap();
        assert_eq!(
            query.sort,
            [
                SortKey::new("created", Direction::Desc),
                SortKey::new("title", Direction::Asc),
            ]
        );

        let query = Query::parse("; sort title").unwrap();
        assert!(query.sections.is_empty());
        assert_eq!(query.sort.len(), 1);
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(Query::parse("   ").unwrap(), Query::all());
    }

    #[test]
    fn test_syntax_errors_carry_offset() {
        let cases = [
            ("type ~ post", 5),
            ("type == post &", 14),
            ("type ==   ", 10),
            ("== post", 0),
            ("type == post & 9x == 1", 15),
            ("a == 1 ; order a", 9),
            ("a == 1 ; sort a sideways", 14),
        ];
        for (text, offset) in cases {
            let err = Query::parse(text).unwrap_err();
            assert_eq!(err.offset(), offset, "{text}");
        }
    }
}
