//! Query evaluation.
//!
//! Sections combine strictly left to right with the running result:
//! `a | b & c` is `(a | b) & c`. There is no precedence between `&` and `|`.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{Connector, Direction, Query, Section, SortKey};
use crate::content::{ContentError, Fields, Value};

/// Sort applied when a query names none.
fn default_sort() -> Vec<SortKey> {
    vec![SortKey::new("created", Direction::Desc)]
}

impl Query {
    /// Contents matching every section, sorted.
    ///
    /// Input order is kept among equal sort keys, so the same input always
    /// yields the same output.
    pub fn filter<F>(&self, items: &[Arc<F>]) -> Result<Vec<Arc<F>>, ContentError>
    where
        F: Fields + ?Sized,
    {
        let selected = self.select(items)?;
        let matched: Vec<Arc<F>> = items
            .iter()
            .zip(selected)
            .filter_map(|(item, keep)| keep.then(|| item.clone()))
            .collect();
        self.sort_items(matched)
    }

    fn select<F>(&self, items: &[Arc<F>]) -> Result<Vec<bool>, ContentError>
    where
        F: Fields + ?Sized,
    {
        let Some((first, rest)) = self.sections.split_first() else {
            return Ok(vec![true; items.len()]);
        };

        let mut selected = items
            .iter()
            .map(|item| matches(first, item.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut connector = first.connector;
        for section in rest {
            for (item, keep) in items.iter().zip(selected.iter_mut()) {
                *keep = match connector {
                    Some(Connector::Or) if !*keep => matches(section, item.as_ref())?,
                    Some(Connector::And) | None if *keep => matches(section, item.as_ref())?,
                    _ => *keep,
                };
            }
            connector = section.connector;
        }
        Ok(selected)
    }

    fn sort_items<F>(&self, items: Vec<Arc<F>>) -> Result<Vec<Arc<F>>, ContentError>
    where
        F: Fields + ?Sized,
    {
        let keys = if self.sort.is_empty() {
            default_sort()
        } else {
            self.sort.clone()
        };

        let mut keyed = items
            .into_iter()
            .map(|item| {
                let values = keys
                    .iter()
                    .map(|key| field_value(item.as_ref(), &key.field))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((item, values))
            })
            .collect::<Result<Vec<_>, ContentError>>()?;

        keyed.sort_by(|(_, a), (_, b)| {
            keys.iter()
                .zip(a.iter().zip(b))
                .map(|(key, (a, b))| {
                    let ord = compare_sort_values(a.as_ref(), b.as_ref());
                    match key.direction {
                        Direction::Asc => ord,
                        Direction::Desc => ord.reverse(),
                    }
                })
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        Ok(keyed.into_iter().map(|(item, _)| item).collect())
    }
}

/// Whether one content satisfies one section. Absent fields never match.
pub fn matches<F>(section: &Section, item: &F) -> Result<bool, ContentError>
where
    F: Fields + ?Sized,
{
    Ok(match field_value(item, &section.field)? {
        Some(value) => section.op.apply(&value, &section.value),
        None => false,
    })
}

/// Value of a possibly dotted field.
fn field_value<F>(item: &F, field: &str) -> Result<Option<Value>, ContentError>
where
    F: Fields + ?Sized,
{
    let mut path = field.split('.');
    let Some(head) = path.next() else {
        return Ok(None);
    };
    let Some(value) = item.get(head)? else {
        return Ok(None);
    };
    Ok(value.lookup(path).cloned())
}

/// Missing values sort lowest. Values of different kinds are ordered by
/// kind so that the order stays total.
fn compare_sort_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => sort_rank(a)
            .cmp(&sort_rank(b))
            .then_with(|| compare_same_rank(a, b)),
    }
}

/// Kinds that compare with each other share a rank.
fn sort_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Str(_) => 2,
        Value::Int(_) | Value::Float(_) => 3,
        Value::Date(_) | Value::DateTime(_) => 4,
        Value::Time(_) => 5,
        _ => 6,
    }
}

fn compare_same_rank(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            let (a, b) = (a.as_f64().unwrap_or_default(), b.as_f64().unwrap_or_default());
            a.total_cmp(&b)
        }
        // A bare date sorts before any time of that day
        (Value::Date(a), Value::DateTime(b)) => a.cmp(&b.date()).then(Ordering::Less),
        (Value::DateTime(a), Value::Date(b)) => a.date().cmp(b).then(Ordering::Greater),
        _ => a
            .loose_cmp(b)
            .unwrap_or_else(|| a.type_name().cmp(b.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{ContentUrl, DocumentKind, UrlScope};
    use crate::content::{ContentFields, DetachedResolver, FieldModel, RawFields, SyntheticFields};

    fn entity(name: &str, pairs: &[(&str, &str)]) -> Arc<ContentFields> {
        let raw: RawFields = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from_literal(v)))
            .collect();
        let url = ContentUrl::parse(
            UrlScope::root(),
            &format!("/{name}/"),
            DocumentKind::HtmlDocument,
        )
        .unwrap();
        ContentFields::new(
            format!("{name}.md"),
            url,
            raw,
            "",
            Arc::new(FieldModel::builtin_content()),
            Arc::new(DetachedResolver),
        )
    }

    fn five_entities() -> Vec<Arc<ContentFields>> {
        vec![
            entity("a", &[("type", "post"), ("tags", "rust"), ("created", "2024-01-01")]),
            entity("b", &[("type", "page"), ("tags", "howto"), ("created", "2024-01-02")]),
            entity("c", &[("type", "post"), ("tags", "howto, rust"), ("created", "2024-01-03")]),
            entity("d", &[("type", "note"), ("created", "2024-01-04")]),
            entity("e", &[("title", "no type")]),
        ]
    }

    fn names(items: &[Arc<ContentFields>]) -> Vec<&str> {
        items.iter().map(|item| item.path()).collect()
    }

    #[test]
    fn test_post_and_howto_scenario() {
        let items = five_entities();
        let query = Query::parse("type == post & tags contains howto").unwrap();
        let result = query.filter(&items).unwrap();
        assert_eq!(names(&result), ["c.md"]);
    }

    #[test]
    fn test_default_sort_newest_first_missing_last() {
        let items = five_entities();
        let result = Query::all().filter(&items).unwrap();
        assert_eq!(names(&result), ["d.md", "c.md", "b.md", "a.md", "e.md"]);
    }

    #[test]
    fn test_sequential_connectors() {
        let items = five_entities();
        // (type == page | type == note) & created > 2024-01-03
        let query = Query::parse("type == page | type == note & created > 2024-01-03").unwrap();
        assert_eq!(names(&query.filter(&items).unwrap()), ["d.md"]);

        // (type == note & created > 2024-01-03) | type == page
        let query = Query::parse("type == note & created > 2024-01-03 | type == page").unwrap();
        assert_eq!(names(&query.filter(&items).unwrap()), ["d.md", "b.md"]);
    }

    #[test]
    fn test_absent_field_never_matches() {
        let items = five_entities();
        let query = Query::parse("type != post").unwrap();
        assert_eq!(names(&query.filter(&items).unwrap()), ["d.md", "b.md"]);

        let query = Query::parse("tags !contains rust").unwrap();
        assert_eq!(names(&query.filter(&items).unwrap()), ["b.md"]);
    }

    #[test]
    fn test_in_and_explicit_sort() {
        let items = five_entities();
        let query = Query::parse("type in post, note ; sort type asc, created asc").unwrap();
        assert_eq!(names(&query.filter(&items).unwrap()), ["d.md", "a.md", "c.md"]);
    }

    #[test]
    fn test_sort_mixed_kinds_is_total() {
        let values = ["5", "b", "2", "a", "9", "1", "c", "7", "3", "12", "x", "4"];
        let items: Vec<_> = values
            .iter()
            .map(|v| entity(&format!("v{v}"), &[("x", *v)]))
            .collect();

        let query = Query::parse("; sort x asc").unwrap();
        assert_eq!(
            names(&query.filter(&items).unwrap()),
            [
                "va.md", "vb.md", "vc.md", "vx.md", "v1.md", "v2.md", "v3.md", "v4.md", "v5.md",
                "v7.md", "v9.md", "v12.md",
            ]
        );
    }

    #[test]
    fn test_default_sort_with_unparsed_created() {
        let mut items = five_entities();
        items.push(entity("f", &[("type", "post"), ("created", "someday")]));
        let result = Query::all().filter(&items).unwrap();
        assert_eq!(
            names(&result),
            ["d.md", "c.md", "b.md", "a.md", "f.md", "e.md"]
        );
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let items = five_entities();
        let query = Query::parse("type == post | tags contains howto ; sort type").unwrap();
        let first = query.filter(&items).unwrap();
        let second = query.filter(&items).unwrap();
        assert_eq!(names(&first), names(&second));
        assert_eq!(names(&first), ["b.md", "a.md", "c.md"]);
    }

    #[test]
    fn test_dotted_fields_on_synthetic() {
        let url = ContentUrl::parse(UrlScope::root(), "/x/", DocumentKind::HtmlDocument).unwrap();
        let mut author = std::collections::BTreeMap::new();
        author.insert("name".to_string(), Value::from("Ada"));
        let item: Arc<SyntheticFields> =
            Arc::new(SyntheticFields::new(url).with("author", Value::Map(author)));

        let query = Query::parse("author.name == Ada").unwrap();
        assert_eq!(query.filter(&[item.clone()]).unwrap().len(), 1);
        let query = Query::parse("author.mail == Ada").unwrap();
        assert!(query.filter(&[item]).unwrap().is_empty());
    }
}
