use crate::commands::import::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardboardError {
    #[error("Space not found: {0}")]
    SpaceNotFound(String),

    #[error("Topic not found: {0}")]
    TopicNotFound(String),

    #[error("Flashcard not found: {0}")]
    FlashcardNotFound(String),

    #[error("Document not found: {collection}/{id}")]
    DocumentNotFound { collection: String, id: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Import rejected: {0}")]
    Import(#[from] ImportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl CardboardError {
    /// True when the error only signals that an entity is absent.
    ///
    /// Presentation layers use this to pick a navigation fallback instead of
    /// reporting a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CardboardError::SpaceNotFound(_)
                | CardboardError::TopicNotFound(_)
                | CardboardError::FlashcardNotFound(_)
                | CardboardError::DocumentNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CardboardError>;
