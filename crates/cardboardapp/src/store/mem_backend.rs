use super::backend::{Collection, Document, DocumentBackend, Query};
use crate::error::{CardboardError, Result};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};

/// In-memory document backend for testing.
///
/// Uses `RefCell` for interior mutability since cardboard is single-threaded.
/// This avoids the overhead of `RwLock` while still allowing the
/// `DocumentBackend` trait to use `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    docs: RefCell<BTreeMap<Collection, BTreeMap<String, Document>>>,
    failing_ids: RefCell<HashSet<String>>,
    write_budget: Cell<Option<usize>>,
    writes: Cell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write touching the document `id` fail, in any collection.
    pub fn fail_writes_for(&self, id: &str) {
        self.failing_ids.borrow_mut().insert(id.to_string());
    }

    /// Let `n` more writes through, then fail every write after them.
    pub fn fail_after_writes(&self, n: usize) {
        self.write_budget.set(Some(n));
    }

    pub fn clear_write_failures(&self) {
        self.failing_ids.borrow_mut().clear();
        self.write_budget.set(None);
    }

    /// Number of successful set/update/delete calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    fn check_write(&self, collection: &Collection, id: &str) -> Result<()> {
        let exhausted = self.write_budget.get() == Some(0);
        if exhausted || self.failing_ids.borrow().contains(id) {
            return Err(CardboardError::Store(format!(
                "Simulated write error on {}/{}",
                collection, id
            )));
        }
        if let Some(left) = self.write_budget.get() {
            self.write_budget.set(Some(left - 1));
        }
        Ok(())
    }
}

impl DocumentBackend for MemBackend {
    fn get(&self, collection: &Collection, id: &str) -> Result<Option<Document>> {
        let docs = self.docs.borrow();
        Ok(docs.get(collection).and_then(|c| c.get(id)).cloned())
    }

    fn list(&self, collection: &Collection, query: &Query) -> Result<Vec<(String, Document)>> {
        let docs = self.docs.borrow();
        let mut found: Vec<(String, Document)> = docs
            .get(collection)
            .map(|c| c.iter().map(|(id, d)| (id.clone(), d.clone())).collect())
            .unwrap_or_default();
        query.apply(&mut found);
        Ok(found)
    }

    fn set(&self, collection: &Collection, id: &str, doc: &Document) -> Result<()> {
        self.check_write(collection, id)?;
        self.docs
            .borrow_mut()
            .entry(collection.clone())
            .or_default()
            .insert(id.to_string(), doc.clone());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn update(&self, collection: &Collection, id: &str, partial: &Document) -> Result<()> {
        self.check_write(collection, id)?;
        let mut docs = self.docs.borrow_mut();
        let existing = docs
            .get_mut(collection)
            .and_then(|c| c.get_mut(id))
            .ok_or_else(|| CardboardError::DocumentNotFound {
                collection: collection.path(),
                id: id.to_string(),
            })?;
        for (key, value) in partial {
            existing.insert(key.clone(), value.clone());
        }
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn delete(&self, collection: &Collection, id: &str) -> Result<()> {
        self.check_write(collection, id)?;
        if let Some(c) = self.docs.borrow_mut().get_mut(collection) {
            c.remove(id);
        }
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn update_merges_fields() {
        let backend = MemBackend::new();
        backend
            .set(&Collection::Spaces, "s1", &doc(json!({"name": "A", "order": 0})))
            .unwrap();
        backend
            .update(&Collection::Spaces, "s1", &doc(json!({"order": 5})))
            .unwrap();
        let stored = backend.get(&Collection::Spaces, "s1").unwrap().unwrap();
        assert_eq!(stored["name"], json!("A"));
        assert_eq!(stored["order"], json!(5));
    }

    #[test]
    fn update_missing_document_is_not_found() {
        let backend = MemBackend::new();
        let err = backend
            .update(&Collection::Topics, "nope", &doc(json!({"posX": 1})))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_missing_document_succeeds() {
        let backend = MemBackend::new();
        backend.delete(&Collection::Spaces, "ghost").unwrap();
    }

    #[test]
    fn collections_are_isolated() {
        let backend = MemBackend::new();
        backend
            .set(&Collection::flashcards("t1"), "c1", &doc(json!({})))
            .unwrap();
        assert!(backend
            .list(&Collection::flashcards("t2"), &Query::all())
            .unwrap()
            .is_empty());
        assert_eq!(
            backend
                .list(&Collection::flashcards("t1"), &Query::all())
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn failure_injection_by_id() {
        let backend = MemBackend::new();
        backend.fail_writes_for("bad");
        assert!(backend
            .set(&Collection::Spaces, "bad", &doc(json!({})))
            .is_err());
        backend
            .set(&Collection::Spaces, "good", &doc(json!({})))
            .unwrap();
        assert_eq!(backend.write_count(), 1);
    }

    #[test]
    fn write_budget_runs_out() {
        let backend = MemBackend::new();
        backend.fail_after_writes(2);
        backend.set(&Collection::Spaces, "a", &doc(json!({}))).unwrap();
        backend.set(&Collection::Spaces, "b", &doc(json!({}))).unwrap();
        assert!(backend.set(&Collection::Spaces, "c", &doc(json!({}))).is_err());

        backend.clear_write_failures();
        backend.set(&Collection::Spaces, "c", &doc(json!({}))).unwrap();
    }
}
