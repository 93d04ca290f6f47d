use super::backend::{Collection, Document, DocumentBackend, Query};
use super::{DataStore, FlashcardPatch, SpacePatch, TopicPatch};
use crate::error::{CardboardError, Result};
use crate::model::{Flashcard, Space, Topic};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Typed entity store over a raw [`DocumentBackend`].
pub struct DocStore<B: DocumentBackend> {
    /// The underlying document backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: DocumentBackend> DocStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

fn to_document<T: Serialize>(value: &T) -> Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(CardboardError::Store(format!(
            "Expected a JSON object, got {}",
            other
        ))),
    }
}

/// Decodes a stored document, filling keys that older writers left out.
fn from_document<T: DeserializeOwned>(
    id: &str,
    mut doc: Document,
    injected: &[(&str, &str)],
) -> Result<T> {
    doc.entry("id").or_insert_with(|| Value::String(id.to_string()));
    for (key, value) in injected {
        doc.entry(*key)
            .or_insert_with(|| Value::String(value.to_string()));
    }
    Ok(serde_json::from_value(Value::Object(doc))?)
}

impl<B: DocumentBackend> DataStore for DocStore<B> {
    fn get_space(&self, id: &str) -> Result<Space> {
        let doc = self
            .backend
            .get(&Collection::Spaces, id)?
            .ok_or_else(|| CardboardError::SpaceNotFound(id.to_string()))?;
        from_document(id, doc, &[])
    }

    fn list_spaces(&self) -> Result<Vec<Space>> {
        self.backend
            .list(&Collection::Spaces, &Query::all().order_by("order"))?
            .into_iter()
            .map(|(id, doc)| from_document(&id, doc, &[]))
            .collect()
    }

    fn save_space(&mut self, space: &Space) -> Result<()> {
        self.backend
            .set(&Collection::Spaces, &space.id, &to_document(space)?)
    }

    fn update_space(&mut self, id: &str, patch: &SpacePatch) -> Result<()> {
        self.backend
            .update(&Collection::Spaces, id, &to_document(patch)?)
            .map_err(|e| match e {
                CardboardError::DocumentNotFound { .. } => {
                    CardboardError::SpaceNotFound(id.to_string())
                }
                other => other,
            })
    }

    fn delete_space(&mut self, id: &str) -> Result<()> {
        self.backend.delete(&Collection::Spaces, id)
    }

    fn get_topic(&self, id: &str) -> Result<Topic> {
        let doc = self
            .backend
            .get(&Collection::Topics, id)?
            .ok_or_else(|| CardboardError::TopicNotFound(id.to_string()))?;
        from_document(id, doc, &[])
    }

    fn list_topics(&self, space_id: &str) -> Result<Vec<Topic>> {
        self.backend
            .list(&Collection::Topics, &Query::where_eq("spaceId", space_id))?
            .into_iter()
            .map(|(id, doc)| from_document(&id, doc, &[]))
            .collect()
    }

    fn save_topic(&mut self, topic: &Topic) -> Result<()> {
        self.backend
            .set(&Collection::Topics, &topic.id, &to_document(topic)?)
    }

    fn update_topic(&mut self, id: &str, patch: &TopicPatch) -> Result<()> {
        self.backend
            .update(&Collection::Topics, id, &to_document(patch)?)
            .map_err(|e| match e {
                CardboardError::DocumentNotFound { .. } => {
                    CardboardError::TopicNotFound(id.to_string())
                }
                other => other,
            })
    }

    fn delete_topic(&mut self, id: &str) -> Result<()> {
        self.backend.delete(&Collection::Topics, id)
    }

    fn get_flashcard(&self, topic_id: &str, id: &str) -> Result<Flashcard> {
        let doc = self
            .backend
            .get(&Collection::flashcards(topic_id), id)?
            .ok_or_else(|| CardboardError::FlashcardNotFound(id.to_string()))?;
        from_document(id, doc, &[("topicId", topic_id)])
    }

    fn list_flashcards(&self, topic_id: &str) -> Result<Vec<Flashcard>> {
        self.backend
            .list(&Collection::flashcards(topic_id), &Query::all())?
            .into_iter()
            .map(|(id, doc)| from_document(&id, doc, &[("topicId", topic_id)]))
            .collect()
    }

    fn save_flashcard(&mut self, card: &Flashcard) -> Result<()> {
        self.backend.set(
            &Collection::flashcards(&card.topic_id),
            &card.id,
            &to_document(card)?,
        )
    }

    fn update_flashcard(
        &mut self,
        topic_id: &str,
        id: &str,
        patch: &FlashcardPatch,
    ) -> Result<()> {
        self.backend
            .update(&Collection::flashcards(topic_id), id, &to_document(patch)?)
            .map_err(|e| match e {
                CardboardError::DocumentNotFound { .. } => {
                    CardboardError::FlashcardNotFound(id.to_string())
                }
                other => other,
            })
    }

    fn delete_flashcard(&mut self, topic_id: &str, id: &str) -> Result<()> {
        self.backend.delete(&Collection::flashcards(topic_id), id)
    }
}
