//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for every
//! cardboard operation, whatever the client.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the matching function in `commands/*.rs`
//! - **Fills defaults** from [`CardboardConfig`] (e.g. canvas position of new topics)
//! - **Returns structured types**, never formatted strings
//!
//! Business logic, I/O and presentation stay out of this file.
//!
//! ## Generic Over DataStore
//!
//! `CardboardApi<S: DataStore>` is generic over the storage backend:
//! - Production: `CardboardApi<FileStore>`
//! - Testing: `CardboardApi<InMemoryStore>`
//!
//! ## Testing Strategy
//!
//! API tests check that calls reach the right command with the right
//! arguments. Command behaviour itself is tested next to each command.

use crate::commands::flashcards::{CardChange, CardRemoval, NewFlashcard, TopicCards};
use crate::commands::import::ImportOutcome;
use crate::commands::ordering::ReorderOutcome;
use crate::commands::spaces::SpaceGroup;
use crate::commands::status::StatusChange;
use crate::commands::topics::NewTopic;
use crate::commands::{self, CascadeReport};
use crate::config::CardboardConfig;
use crate::error::Result;
use crate::gesture::{DragRelease, Point, PointerDrag};
use crate::model::{CardStatus, Flashcard, Space, StatusFilter, Topic};
use crate::session::TopicSession;
use crate::store::{BatchReport, DataStore};

/// The main API facade for cardboard operations.
pub struct CardboardApi<S: DataStore> {
    store: S,
    config: CardboardConfig,
}

impl<S: DataStore> CardboardApi<S> {
    pub fn new(store: S, config: CardboardConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &CardboardConfig {
        &self.config
    }

    // --- Spaces ---

    pub fn create_space(&mut self, name: &str, group: &str) -> Result<Space> {
        commands::spaces::create(&mut self.store, name, group)
    }

    pub fn list_spaces(&self) -> Result<Vec<Space>> {
        commands::spaces::list(&self.store)
    }

    pub fn grouped_spaces(&self) -> Result<Vec<SpaceGroup>> {
        commands::spaces::grouped(&self.store)
    }

    pub fn get_space(&self, id: &str) -> Result<Space> {
        self.store.get_space(id)
    }

    pub fn rename_space(&mut self, id: &str, name: &str) -> Result<()> {
        commands::spaces::rename(&mut self.store, id, name)
    }

    pub fn set_space_group(&mut self, id: &str, group: &str) -> Result<()> {
        commands::spaces::set_group(&mut self.store, id, group)
    }

    pub fn reorder_spaces(&mut self, ordered_ids: &[String]) -> Result<BatchReport> {
        commands::spaces::reorder(&mut self.store, ordered_ids)
    }

    pub fn delete_space(&mut self, id: &str) -> Result<CascadeReport> {
        commands::spaces::delete(&mut self.store, id)
    }

    pub fn rename_group(&mut self, from: &str, to: &str) -> Result<BatchReport> {
        commands::spaces::rename_group(&mut self.store, from, to)
    }

    pub fn delete_group(&mut self, name: &str) -> Result<CascadeReport> {
        commands::spaces::delete_group(&mut self.store, name)
    }

    // --- Topics ---

    /// Creates a topic; without a position it lands on the configured default.
    pub fn create_topic(
        &mut self,
        space_id: &str,
        title: &str,
        content: &str,
        position: Option<(f64, f64)>,
    ) -> Result<Topic> {
        let (pos_x, pos_y) =
            position.unwrap_or((self.config.default_topic_x, self.config.default_topic_y));
        commands::topics::create(
            &mut self.store,
            NewTopic {
                space_id: space_id.to_string(),
                title: title.to_string(),
                content: content.to_string(),
                pos_x,
                pos_y,
            },
        )
    }

    pub fn get_topic(&self, id: &str) -> Result<Topic> {
        commands::topics::get(&self.store, id)
    }

    pub fn list_topics(&self, space_id: &str) -> Result<Vec<Topic>> {
        commands::topics::list(&self.store, space_id)
    }

    pub fn update_topic(
        &mut self,
        id: &str,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<Topic> {
        commands::topics::update(&mut self.store, id, title, content)
    }

    pub fn delete_topic(&mut self, id: &str) -> Result<CascadeReport> {
        commands::topics::delete(&mut self.store, id)
    }

    pub fn move_topic(&mut self, topic_id: &str, x: f64, y: f64) -> Result<()> {
        commands::canvas::move_topic(&mut self.store, topic_id, x, y)
    }

    pub fn release_topic_drag(
        &mut self,
        topic_id: &str,
        drag: &PointerDrag,
        pointer: Point,
    ) -> Result<DragRelease> {
        commands::canvas::release_drag(&mut self.store, topic_id, drag, pointer)
    }

    // --- Flashcards ---

    pub fn load_topic(&mut self, topic_id: &str) -> Result<TopicCards> {
        commands::flashcards::load(&mut self.store, topic_id)
    }

    /// Loads a topic into a fresh view session.
    pub fn open_session(&mut self, topic_id: &str) -> Result<TopicSession> {
        Ok(TopicSession::new(self.load_topic(topic_id)?))
    }

    pub fn list_flashcards(&self, topic_id: &str) -> Result<Vec<Flashcard>> {
        self.store.get_topic(topic_id)?;
        commands::ordering::ordered_cards(&self.store, topic_id)
    }

    pub fn create_flashcard(&mut self, topic_id: &str, card: NewFlashcard) -> Result<CardChange> {
        commands::flashcards::create(&mut self.store, topic_id, card)
    }

    pub fn edit_flashcard(
        &mut self,
        topic_id: &str,
        card_id: &str,
        card: NewFlashcard,
    ) -> Result<CardChange> {
        commands::flashcards::edit(&mut self.store, topic_id, card_id, card)
    }

    pub fn delete_flashcard(&mut self, topic_id: &str, card_id: &str) -> Result<CardRemoval> {
        commands::flashcards::delete(&mut self.store, topic_id, card_id)
    }

    pub fn reorder_flashcards(
        &mut self,
        topic_id: &str,
        ordered_ids: &[String],
    ) -> Result<ReorderOutcome> {
        commands::ordering::reorder_by_ids(&mut self.store, topic_id, ordered_ids)
    }

    /// Drag reorder by indices into the list shown under `filter`.
    pub fn move_flashcard(
        &mut self,
        topic_id: &str,
        filter: Option<StatusFilter>,
        from: usize,
        to: usize,
    ) -> Result<ReorderOutcome> {
        commands::ordering::move_card(&mut self.store, topic_id, filter, from, to)
    }

    pub fn set_card_status(
        &mut self,
        topic_id: &str,
        card_id: &str,
        status: CardStatus,
    ) -> Result<StatusChange> {
        commands::status::set_card_status(&mut self.store, topic_id, card_id, status)
    }

    pub fn recompute_success_average(&mut self, topic_id: &str) -> Result<f64> {
        commands::status::recompute_success_average(&mut self.store, topic_id)
    }

    pub fn import_flashcards_from_json(
        &mut self,
        topic_id: &str,
        json_text: &str,
    ) -> Result<ImportOutcome> {
        commands::import::run(&mut self.store, topic_id, json_text)
    }
}
