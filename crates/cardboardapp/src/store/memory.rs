use super::doc_store::DocStore;
use super::fs_backend::FsBackend;
use super::mem_backend::MemBackend;
use std::path::PathBuf;

pub type InMemoryStore = DocStore<MemBackend>;
pub type FileStore = DocStore<FsBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        DocStore::with_backend(MemBackend::new())
    }
}

impl FileStore {
    pub fn open(root: PathBuf) -> Self {
        DocStore::with_backend(FsBackend::new(root))
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{CardStatus, Flashcard, Space, Topic, DEFAULT_TEXT_COLOR};
    use crate::store::DataStore;

    /// Builds a store with hand-picked ids so tests can address entities directly.
    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_space(mut self, id: &str, group: &str, order: i64) -> Self {
            let space = Space {
                id: id.to_string(),
                name: format!("Space {}", id),
                group: group.to_string(),
                order,
            };
            self.store.save_space(&space).unwrap();
            self
        }

        pub fn with_topic(mut self, id: &str, space_id: &str) -> Self {
            let topic = Topic {
                id: id.to_string(),
                space_id: space_id.to_string(),
                title: format!("Topic {}", id),
                content: String::new(),
                pos_x: 50.0,
                pos_y: 50.0,
                success_average: None,
            };
            self.store.save_topic(&topic).unwrap();
            self
        }

        /// Adds cards with ids taken from `cards`, `idOrder` 1..N in slice order.
        pub fn with_cards(mut self, topic_id: &str, cards: &[(&str, CardStatus)]) -> Self {
            for (i, (id, status)) in cards.iter().enumerate() {
                let card = Flashcard {
                    id: id.to_string(),
                    topic_id: topic_id.to_string(),
                    question: format!("Question {}", id),
                    question_html_content: None,
                    answer: format!("Answer {}", id),
                    html_content: None,
                    is_bold: false,
                    is_italic: false,
                    text_color: DEFAULT_TEXT_COLOR.to_string(),
                    id_order: i as i64 + 1,
                    status: *status,
                    status_missing: false,
                };
                self.store.save_flashcard(&card).unwrap();
            }
            self
        }

        pub fn build(self) -> InMemoryStore {
            self.store
        }
    }
}
