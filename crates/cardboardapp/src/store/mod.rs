//! # Storage Layer
//!
//! The storage layer is split in two, the same way for every backend:
//!
//! 1. **Raw documents** ([`backend::DocumentBackend`]): `get`, `list`, `set`,
//!    `update`, `delete` keyed by collection + id. Atomic per document, never
//!    transactional across documents.
//! 2. **Typed entities** ([`DataStore`]): CRUD for [`Space`], [`Topic`] and
//!    [`Flashcard`], implemented once by [`doc_store::DocStore`] over any backend.
//!
//! ## Collections
//!
//! ```text
//! spaces/{spaceId}
//! topics/{topicId}                  # filtered by spaceId
//! topics/{topicId}/flashcards/{id}
//! ```
//!
//! Topics are stored only in the top-level `topics` collection. The nested
//! `spaces/{id}/subjects` layout is not read or written.
//!
//! ## Partial Updates
//!
//! Mutations that touch a few fields go through typed patch structs
//! ([`SpacePatch`], [`TopicPatch`], [`FlashcardPatch`]). Only the fields that are
//! `Some` end up in the partial document, so a patch never clobbers fields it
//! does not mention.
//!
//! ## Implementations
//!
//! - [`memory::InMemoryStore`]: For testing logic without filesystem I/O.
//! - [`memory::FileStore`]: JSON files on disk via [`fs_backend::FsBackend`].

use crate::error::Result;
use crate::model::{CardStatus, Flashcard, Space, Topic};
use serde::Serialize;

pub mod backend;
pub mod batch;
pub mod doc_store;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;

pub use batch::{BatchFailure, BatchReport};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpacePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_average: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_html_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CardStatus>,
}

impl FlashcardPatch {
    pub fn order(id_order: i64) -> Self {
        Self {
            id_order: Some(id_order),
            ..Default::default()
        }
    }

    pub fn status(status: CardStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

/// Abstract interface for typed entity storage.
pub trait DataStore {
    fn get_space(&self, id: &str) -> Result<Space>;

    /// All spaces, ascending by `order`.
    fn list_spaces(&self) -> Result<Vec<Space>>;

    /// Create or overwrite a space.
    fn save_space(&mut self, space: &Space) -> Result<()>;

    fn update_space(&mut self, id: &str, patch: &SpacePatch) -> Result<()>;

    fn delete_space(&mut self, id: &str) -> Result<()>;

    fn get_topic(&self, id: &str) -> Result<Topic>;

    /// Topics whose `spaceId` equals `space_id`.
    fn list_topics(&self, space_id: &str) -> Result<Vec<Topic>>;

    fn save_topic(&mut self, topic: &Topic) -> Result<()>;

    fn update_topic(&mut self, id: &str, patch: &TopicPatch) -> Result<()>;

    fn delete_topic(&mut self, id: &str) -> Result<()>;

    fn get_flashcard(&self, topic_id: &str, id: &str) -> Result<Flashcard>;

    /// Cards of a topic, unsorted.
    fn list_flashcards(&self, topic_id: &str) -> Result<Vec<Flashcard>>;

    fn save_flashcard(&mut self, card: &Flashcard) -> Result<()>;

    fn update_flashcard(&mut self, topic_id: &str, id: &str, patch: &FlashcardPatch)
        -> Result<()>;

    fn delete_flashcard(&mut self, topic_id: &str, id: &str) -> Result<()>;
}
