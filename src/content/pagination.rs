//! Pagination of query results.
//!
//! A `pagination` field holds a query, either as a string or as a map with
//! an explicit page size:
//!
//! ```text
//! pagination: type == post             per_page from settings
//! pagination:
//!   query: type == post
//!   per_page: 5
//! ```
//!
//! Page 1 lives at the origin URL, page `n` at `<origin>/<partition>/<n>/`.

use std::fmt;
use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::{ContentError, ContentFields, Fields, GeneratedFields, PAGINATION_KEY, Value};
use crate::address::ContentUrl;
use crate::query::Query;

/// One page of paginated contents.
#[derive(Debug)]
pub struct PaginationPage {
    /// 1-based.
    pub position: usize,
    pub total: usize,
    pub items: Vec<Arc<ContentFields>>,
    pub url: ContentUrl,
    pub previous: Option<ContentUrl>,
    pub next: Option<ContentUrl>,
}

impl PaginationPage {
    pub fn is_first(&self) -> bool {
        self.position == 1
    }

    pub fn is_last(&self) -> bool {
        self.position == self.total
    }
}

impl PartialEq for PaginationPage {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.url == other.url
    }
}

impl Serialize for PaginationPage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let items: Vec<&ContentUrl> = self.items.iter().map(|item| item.url()).collect();
        let mut page = serializer.serialize_struct("PaginationPage", 6)?;
        page.serialize_field("position", &self.position)?;
        page.serialize_field("total", &self.total)?;
        page.serialize_field("url", &self.url)?;
        page.serialize_field("previous", &self.previous)?;
        page.serialize_field("next", &self.next)?;
        page.serialize_field("items", &items)?;
        page.end()
    }
}

/// Every page of one origin content.
pub struct Paginated {
    pages: Vec<Arc<PaginationPage>>,
    generated: Vec<Arc<GeneratedFields>>,
}

impl Paginated {
    pub fn first(&self) -> Arc<PaginationPage> {
        self.pages[0].clone()
    }

    pub fn pages(&self) -> &[Arc<PaginationPage>] {
        &self.pages
    }

    pub fn page(&self, position: usize) -> Option<&Arc<PaginationPage>> {
        position.checked_sub(1).and_then(|idx| self.pages.get(idx))
    }

    /// Generated contents of pages 2 and up.
    pub fn generated(&self) -> &[Arc<GeneratedFields>] {
        &self.generated
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl fmt::Debug for Paginated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginated")
            .field("pages", &self.pages.len())
            .finish()
    }
}

/// What a `pagination` field asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationRequest {
    pub query: String,
    pub per_page: Option<usize>,
}

impl PaginationRequest {
    pub fn from_value(path: &str, raw: &Value) -> Result<Self, ContentError> {
        let error = |message: String| ContentError::Pagination {
            path: path.to_string(),
            message,
        };

        match raw {
            Value::Str(query) => Ok(Self {
                query: query.clone(),
                per_page: None,
            }),
            Value::Map(map) => {
                let query = map
                    .get("query")
                    .ok_or_else(|| error("missing `query`".into()))?
                    .to_string();
                let per_page = match map.get("per_page") {
                    None => None,
                    Some(Value::Int(n)) if *n > 0 => Some(*n as usize),
                    Some(other) => {
                        return Err(error(format!("`per_page` must be a positive int, got {other}")));
                    }
                };
                Ok(Self { query, per_page })
            }
            other => Err(error(format!(
                "expected a query or a map, got {}",
                other.type_name()
            ))),
        }
    }
}

/// Split the contents matching the origin's pagination query into pages.
///
/// Always yields at least one page, so an origin with no matches still
/// renders its first page.
pub fn paginate(
    origin: &Arc<ContentFields>,
    raw: &Value,
    contents: &[Arc<ContentFields>],
    default_per_page: usize,
    partition: &str,
) -> Result<Paginated, ContentError> {
    let request = PaginationRequest::from_value(origin.path(), raw)?;
    let per_page = request.per_page.unwrap_or(default_per_page).max(1);
    let matched = Query::parse(&request.query)?.filter(contents)?;

    let total = matched.len().div_ceil(per_page).max(1);
    let urls = (1..=total)
        .map(|position| page_url(origin.url(), partition, position))
        .collect::<Result<Vec<_>, _>>()?;

    let mut chunks = matched.chunks(per_page);
    let pages: Vec<Arc<PaginationPage>> = (0..total)
        .map(|idx| {
            Arc::new(PaginationPage {
                position: idx + 1,
                total,
                items: chunks.next().map(|chunk| chunk.to_vec()).unwrap_or_default(),
                url: urls[idx].clone(),
                previous: idx.checked_sub(1).map(|prev| urls[prev].clone()),
                next: urls.get(idx + 1).cloned(),
            })
        })
        .collect();

    let generated = pages
        .iter()
        .skip(1)
        .map(|page| {
            Arc::new(
                GeneratedFields::new(origin.clone(), page.url.clone())
                    .with(PAGINATION_KEY, Value::Page(page.clone())),
            )
        })
        .collect();

    Ok(Paginated { pages, generated })
}

fn page_url(origin: &ContentUrl, partition: &str, position: usize) -> Result<ContentUrl, ContentError> {
    if position == 1 {
        return Ok(origin.clone());
    }
    let kind = origin.kind().to_generated();
    Ok(origin.join(&format!("{partition}/{position}/"), Some(kind))?)
}
