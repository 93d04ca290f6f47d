//! # Bulk JSON Import
//!
//! Accepts a document of the form:
//!
//! ```json
//! {
//!   "cards": [
//!     { "question": "2 + 2?", "answer": "4" },
//!     { "question": "Capital of France?", "answer": "Paris",
//!       "isBold": true, "isItalic": false, "textColor": "#FF0000",
//!       "idOrder": 7, "status": 3 }
//!   ]
//! }
//! ```
//!
//! The whole document is validated before the first write. Any problem aborts
//! the import with an [`ImportError`] naming the offending card (0-based) and
//! field, and nothing is stored.
//!
//! Optional fields default to `isBold = false`, `isItalic = false`,
//! `textColor = "#FFFFFF"`, `status = 0`. A card without `idOrder` gets the
//! next value after the highest order seen so far, counting both the topic's
//! existing cards and explicit `idOrder`s earlier in the same import.
//!
//! Valid cards are written one at a time. A store failure stops the import;
//! the cards already written are reported alongside the error, and the
//! success average is recomputed once either way.

use super::ordering;
use super::status::recompute_success_average;
use crate::error::{CardboardError, Result};
use crate::model::{is_hex_color, new_id, CardStatus, Flashcard, DEFAULT_TEXT_COLOR};
use crate::store::DataStore;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("top-level value must be an object")]
    NotAnObject,

    #[error("missing 'cards' array")]
    MissingCards,

    #[error("'cards' must contain at least one card")]
    NoCards,

    #[error("card {index}: must be an object")]
    CardNotObject { index: usize },

    #[error("card {index}: missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("card {index}: field '{field}' must not be empty")]
    EmptyField { index: usize, field: &'static str },

    #[error("card {index}: field '{field}' must be {expected}")]
    WrongType {
        index: usize,
        field: &'static str,
        expected: &'static str,
    },

    #[error("card {index}: textColor '{value}' is not a #RGB or #RRGGBB colour")]
    InvalidColor { index: usize, value: String },

    #[error("card {index}: status {value} is outside 0-4")]
    InvalidStatus { index: usize, value: String },
}

impl ImportError {
    /// The 0-based card the error refers to, if any.
    pub fn card_index(&self) -> Option<usize> {
        match self {
            ImportError::CardNotObject { index }
            | ImportError::MissingField { index, .. }
            | ImportError::EmptyField { index, .. }
            | ImportError::WrongType { index, .. }
            | ImportError::InvalidColor { index, .. }
            | ImportError::InvalidStatus { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// One validated card from an import document.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedCard {
    pub question: String,
    pub answer: String,
    pub is_bold: bool,
    pub is_italic: bool,
    pub text_color: String,
    pub id_order: Option<i64>,
    pub status: CardStatus,
}

/// What an import stored, and why it stopped early if it did.
#[derive(Debug)]
pub struct ImportOutcome {
    pub created: Vec<Flashcard>,
    pub error: Option<CardboardError>,
    pub average: Option<f64>,
}

impl ImportOutcome {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Validates an import document without touching any store.
pub fn parse(json_text: &str) -> std::result::Result<Vec<ImportedCard>, ImportError> {
    let root: Value =
        serde_json::from_str(json_text).map_err(|e| ImportError::InvalidJson(e.to_string()))?;
    let root = root.as_object().ok_or(ImportError::NotAnObject)?;
    let cards = root
        .get("cards")
        .and_then(Value::as_array)
        .ok_or(ImportError::MissingCards)?;
    if cards.is_empty() {
        return Err(ImportError::NoCards);
    }

    cards
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let card = value
                .as_object()
                .ok_or(ImportError::CardNotObject { index })?;
            parse_card(index, card)
        })
        .collect()
}

fn parse_card(index: usize, card: &Map<String, Value>) -> std::result::Result<ImportedCard, ImportError> {
    let question = required_text(index, card, "question")?;
    let answer = required_text(index, card, "answer")?;
    let is_bold = optional_bool(index, card, "isBold")?;
    let is_italic = optional_bool(index, card, "isItalic")?;

    let text_color = match card.get("textColor") {
        None => DEFAULT_TEXT_COLOR.to_string(),
        Some(Value::String(color)) if is_hex_color(color) => color.clone(),
        Some(Value::String(color)) => {
            return Err(ImportError::InvalidColor {
                index,
                value: color.clone(),
            })
        }
        Some(_) => return Err(wrong_type(index, "textColor", "a string")),
    };

    let id_order = match card.get("idOrder") {
        None => None,
        Some(value) => Some(integer(index, "idOrder", value)?),
    };

    let status = match card.get("status") {
        None => CardStatus::Unset,
        Some(value) => {
            let raw = integer(index, "status", value)?;
            u8::try_from(raw)
                .ok()
                .and_then(|v| CardStatus::try_from(v).ok())
                .ok_or(ImportError::InvalidStatus {
                    index,
                    value: raw.to_string(),
                })?
        }
    };

    Ok(ImportedCard {
        question,
        answer,
        is_bold,
        is_italic,
        text_color,
        id_order,
        status,
    })
}

fn wrong_type(index: usize, field: &'static str, expected: &'static str) -> ImportError {
    ImportError::WrongType {
        index,
        field,
        expected,
    }
}

fn required_text(
    index: usize,
    card: &Map<String, Value>,
    field: &'static str,
) -> std::result::Result<String, ImportError> {
    match card.get(field) {
        None => Err(ImportError::MissingField { index, field }),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ImportError::EmptyField { index, field }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(wrong_type(index, field, "a string")),
    }
}

fn optional_bool(
    index: usize,
    card: &Map<String, Value>,
    field: &'static str,
) -> std::result::Result<bool, ImportError> {
    match card.get(field) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(wrong_type(index, field, "a boolean")),
    }
}

fn integer(index: usize, field: &'static str, value: &Value) -> std::result::Result<i64, ImportError> {
    match value {
        Value::Number(n) => n.as_i64().ok_or(wrong_type(index, field, "an integer")),
        _ => Err(wrong_type(index, field, "a number")),
    }
}

/// Validates `json_text` and appends its cards to `topic_id`.
///
/// Validation failures return `Err` with nothing written. Once writing starts,
/// the outcome carries whatever was created plus the first store error.
pub fn run<S: DataStore>(store: &mut S, topic_id: &str, json_text: &str) -> Result<ImportOutcome> {
    let parsed = parse(json_text)?;
    store.get_topic(topic_id)?;
    let mut running_max = ordering::next_order(&store.list_flashcards(topic_id)?) - 1;

    let mut created = Vec::with_capacity(parsed.len());
    let mut error = None;
    for card in parsed {
        let id_order = match card.id_order {
            Some(given) => {
                running_max = running_max.max(given);
                given
            }
            None => {
                running_max += 1;
                running_max
            }
        };
        let flashcard = Flashcard {
            id: new_id(),
            topic_id: topic_id.to_string(),
            question: card.question,
            question_html_content: None,
            answer: card.answer,
            html_content: None,
            is_bold: card.is_bold,
            is_italic: card.is_italic,
            text_color: card.text_color,
            id_order,
            status: card.status,
            status_missing: false,
        };
        if let Err(e) = store.save_flashcard(&flashcard) {
            tracing::warn!(topic = topic_id, created = created.len(), error = %e, "import stopped");
            error = Some(e);
            break;
        }
        created.push(flashcard);
    }

    let average = match recompute_success_average(store, topic_id) {
        Ok(average) => Some(average),
        Err(e) => {
            tracing::warn!(topic = topic_id, error = %e, "average not updated after import");
            error.get_or_insert(e);
            None
        }
    };
    tracing::info!(topic = topic_id, created = created.len(), "flashcards imported");
    Ok(ImportOutcome {
        created,
        error,
        average,
    })
}
