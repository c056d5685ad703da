//! Normalized path components.
//!
//! A [`PathAddress`] is the canonical component sequence of a path-like
//! string. Leading and trailing empty components survive normalization: the
//! leading one marks the path as root-relative, the trailing one keeps the
//! trailing slash. Interior empties, `.` and `..` are resolved away.

use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Serialize, Serializer};

use super::AddressError;

/// Both separators are accepted on input; output always uses `/`.
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\\/]+").unwrap());

/// Normalized, immutable sequence of path components.
///
/// Always starts with an empty component. `[""]` is the root `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathAddress(Arc<[String]>);

impl PathAddress {
    /// The root address `/`.
    pub fn root() -> Self {
        Self(Arc::from([String::new()]))
    }

    /// Parse a single path string.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        Self::from_parts([raw])
    }

    /// Concatenate several path strings (each split on `/` and `\`) and
    /// normalize the result.
    pub fn from_parts<I, S>(parts: I) -> Result<Self, AddressError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut comps = Vec::new();
        for part in parts {
            split_into(part.as_ref(), &mut comps);
        }
        Self::from_components(comps)
    }

    /// Normalize already split components.
    pub fn from_components(comps: Vec<String>) -> Result<Self, AddressError> {
        let comps = normalize_components(comps);
        validate(&comps)?;
        Ok(Self(comps.into()))
    }

    #[inline]
    pub fn components(&self) -> &[String] {
        &self.0
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// Whether the path ends with `/`. The root always does.
    #[inline]
    pub fn has_trailing_slash(&self) -> bool {
        self.0.last().is_some_and(String::is_empty)
    }

    /// Non-empty components, i.e. the path without its slashes.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str).filter(|c| !c.is_empty())
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Join `other` onto `self`, merging the adjacent boundary components.
    ///
    /// `/a/` + `/b` and `/a` + `b` both give `/a/b`. The merged sequence is
    /// normalized again, so interior empties never leak through.
    pub fn join(&self, other: &PathAddress) -> Result<Self, AddressError> {
        let this = &self.0;
        let other = &other.0;
        let (this_end, this_init) = match this.split_last() {
            Some(split) => split,
            None => return Ok(Self(other.clone())),
        };
        let (other_start, other_rest) = match other.split_first() {
            Some(split) => split,
            None => return Ok(self.clone()),
        };

        let boundary = match (this_end.is_empty(), other_start.is_empty()) {
            (false, false) => format!("{this_end}{other_start}"),
            (true, _) => other_start.clone(),
            (false, true) => this_end.clone(),
        };

        let mut comps = Vec::with_capacity(this.len() + other.len());
        comps.extend(this_init.iter().cloned());
        comps.push(boundary);
        comps.extend(other_rest.iter().cloned());
        Self::from_components(comps)
    }

    /// Same path with a trailing slash.
    pub fn with_trailing_slash(&self) -> Self {
        if self.has_trailing_slash() {
            return self.clone();
        }
        let mut comps = self.0.to_vec();
        comps.push(String::new());
        Self(comps.into())
    }

    /// Prepend components (site scoping). Both sides are already valid.
    pub(crate) fn prefixed<S: AsRef<str>>(&self, prefix: &[S]) -> Self {
        let mut comps: Vec<String> = Vec::with_capacity(prefix.len() + self.0.len());
        comps.push(String::new());
        comps.extend(prefix.iter().map(|c| c.as_ref().to_string()));
        comps.extend(self.0.iter().cloned());
        Self(normalize_components(comps).into())
    }

    /// `/`-joined string form. The root renders as `/`.
    pub fn to_path_string(&self) -> String {
        if self.is_root() {
            "/".to_string()
        } else {
            self.0.join("/")
        }
    }
}

impl Default for PathAddress {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for PathAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path_string())
    }
}

impl Serialize for PathAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

fn split_into(raw: &str, out: &mut Vec<String>) {
    if raw.is_empty() {
        out.push(String::new());
        return;
    }
    out.extend(SEPARATORS.split(raw).map(str::to_string));
}

/// Normalize a split component sequence.
///
/// Pure and idempotent: applying it to its own output changes nothing.
pub fn normalize_components(comps: Vec<String>) -> Vec<String> {
    let last = comps.len().saturating_sub(1);

    // Interior empties go, the first and last survive
    let spared = comps
        .into_iter()
        .enumerate()
        .filter(|(idx, comp)| *idx == 0 || *idx == last || !comp.is_empty());

    let mut out: Vec<String> = Vec::new();
    for (idx, comp) in spared {
        match comp.as_str() {
            "." => {}
            ".." => {
                if idx != 0 {
                    out.pop();
                }
            }
            _ => out.push(comp),
        }
    }

    if out.first().is_none_or(|first| !first.is_empty()) {
        out.insert(0, String::new());
    }
    if out.len() == 2 && out[1].is_empty() {
        out.truncate(1);
    }
    out
}

fn validate(comps: &[String]) -> Result<(), AddressError> {
    match comps
        .iter()
        .position(|c| !c.is_empty() && c.chars().all(char::is_whitespace))
    {
        Some(index) => Err(AddressError::InvalidAddressInput {
            input: comps.join("/"),
            index,
        }),
        None => Ok(()),
    }
}
