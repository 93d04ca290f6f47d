use crate::error::Result;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

/// A stored document: a flat JSON object.
pub type Document = Map<String, Value>;

/// The collections the store knows about.
///
/// Topics live in one top-level collection filtered by `spaceId`; flashcards
/// live in a sub-collection per topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Spaces,
    Topics,
    Flashcards { topic_id: String },
}

impl Collection {
    pub fn flashcards(topic_id: &str) -> Self {
        Collection::Flashcards {
            topic_id: topic_id.to_string(),
        }
    }

    /// Slash-separated collection path, e.g. `topics/{id}/flashcards`.
    pub fn path(&self) -> String {
        match self {
            Collection::Spaces => "spaces".to_string(),
            Collection::Topics => "topics".to_string(),
            Collection::Flashcards { topic_id } => format!("topics/{}/flashcards", topic_id),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub equals: Value,
}

/// Optional equality filter plus optional ascending sort field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Option<FieldFilter>,
    pub order_by: Option<String>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn where_eq(field: &str, value: impl Into<Value>) -> Self {
        Self {
            filter: Some(FieldFilter {
                field: field.to_string(),
                equals: value.into(),
            }),
            order_by: None,
        }
    }

    pub fn order_by(mut self, field: &str) -> Self {
        self.order_by = Some(field.to_string());
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match &self.filter {
            Some(filter) => doc.get(&filter.field) == Some(&filter.equals),
            None => true,
        }
    }

    /// Filters and sorts `(id, document)` pairs in place.
    ///
    /// Documents missing the sort field sort first; ties keep id order.
    pub fn apply(&self, docs: &mut Vec<(String, Document)>) {
        docs.retain(|(_, doc)| self.matches(doc));
        docs.sort_by(|a, b| a.0.cmp(&b.0));
        if let Some(field) = &self.order_by {
            docs.sort_by(|a, b| compare_values(a.1.get(field), b.1.get(field)));
        }
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Abstract interface for raw document I/O.
///
/// This trait handles the "how" of persistence (filesystem vs memory), while
/// [`super::doc_store::DocStore`] handles the "what" (typed entities, legacy
/// fix-ups). Every call is atomic for a single document only; nothing is
/// transactional across documents.
pub trait DocumentBackend {
    /// Fetch one document. `Ok(None)` when it does not exist.
    fn get(&self, collection: &Collection, id: &str) -> Result<Option<Document>>;

    /// List `(id, document)` pairs matching the query.
    fn list(&self, collection: &Collection, query: &Query) -> Result<Vec<(String, Document)>>;

    /// Full overwrite.
    fn set(&self, collection: &Collection, id: &str, doc: &Document) -> Result<()>;

    /// Merge `partial` into an existing document.
    /// Fails with `DocumentNotFound` if the document does not exist.
    fn update(&self, collection: &Collection, id: &str, partial: &Document) -> Result<()>;

    /// Remove a document. Deleting a missing document succeeds.
    fn delete(&self, collection: &Collection, id: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn collection_paths() {
        assert_eq!(Collection::Spaces.path(), "spaces");
        assert_eq!(Collection::Topics.path(), "topics");
        assert_eq!(Collection::flashcards("t1").path(), "topics/t1/flashcards");
    }

    #[test]
    fn query_filters_and_orders_numerically() {
        let mut docs = vec![
            ("a".to_string(), doc(json!({"spaceId": "s1", "order": 10}))),
            ("b".to_string(), doc(json!({"spaceId": "s2", "order": 1}))),
            ("c".to_string(), doc(json!({"spaceId": "s1", "order": 2}))),
        ];
        Query::where_eq("spaceId", "s1").order_by("order").apply(&mut docs);
        let ids: Vec<&str> = docs.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn missing_sort_field_sorts_first() {
        let mut docs = vec![
            ("a".to_string(), doc(json!({"order": 0}))),
            ("b".to_string(), doc(json!({}))),
        ];
        Query::all().order_by("order").apply(&mut docs);
        assert_eq!(docs[0].0, "b");
    }
}
