//! # Domain Model
//!
//! Three independent document types, linked by foreign keys rather than embedding:
//!
//! ```text
//! Space ──1:N──▶ Topic (spaceId) ──1:N──▶ Flashcard (topicId)
//! ```
//!
//! Deleting a parent cascades to its children (see [`crate::commands::spaces::delete`]).
//!
//! ## Field Names
//!
//! Documents are persisted with camelCase keys (`spaceId`, `posX`, `idOrder`,
//! `successAverage`, ...). These keys are the on-disk contract shared with
//! existing data and must not be renamed.
//!
//! ## Card Status
//!
//! [`CardStatus`] is stored as a bare integer:
//!
//! | Value | Status    |
//! |-------|-----------|
//! | 0     | Unset     |
//! | 1     | New       |
//! | 2     | Learning  |
//! | 3     | Reviewing |
//! | 4     | Mastered  |
//!
//! Unset is treated exactly like New everywhere a status is interpreted
//! (averaging, filtering, button selection).
//!
//! ## Legacy Documents
//!
//! Flashcards written before status tracking existed have no `status` key, and
//! older ones have no `idOrder` or style keys either. [`Flashcard`] deserialises
//! those with defaults and remembers whether `status` was missing so the loader
//! can persist the migration.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_GROUP: &str = "Default";
pub const DEFAULT_TEXT_COLOR: &str = "#FFFFFF";

/// Generates a fresh document id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^#([0-9A-F]{3}){1,2}$").expect("valid colour pattern"));

/// `#RGB` or `#RRGGBB`, case-insensitive.
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

/// Normalises a group label: blank input falls back to [`DEFAULT_GROUP`].
pub fn normalize_group(group: &str) -> String {
    let trimmed = group.trim();
    if trimmed.is_empty() {
        DEFAULT_GROUP.to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub order: i64,
}

impl Space {
    /// The group this space is displayed under.
    pub fn display_group(&self) -> String {
        normalize_group(&self.group)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub space_id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub pos_x: f64,
    #[serde(default)]
    pub pos_y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_average: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CardStatus {
    #[default]
    Unset,
    New,
    Learning,
    Reviewing,
    Mastered,
}

impl CardStatus {
    /// The four selectable statuses, in button order.
    pub const BUTTONS: [CardStatus; 4] = [
        CardStatus::New,
        CardStatus::Learning,
        CardStatus::Reviewing,
        CardStatus::Mastered,
    ];

    pub fn value(self) -> u8 {
        match self {
            CardStatus::Unset => 0,
            CardStatus::New => 1,
            CardStatus::Learning => 2,
            CardStatus::Reviewing => 3,
            CardStatus::Mastered => 4,
        }
    }

    /// Status value used for averaging: Unset counts as New.
    pub fn effective(self) -> u8 {
        match self {
            CardStatus::Unset => 1,
            other => other.value(),
        }
    }

    /// The status button shown as selected for a card with this status.
    pub fn selected_button(self) -> CardStatus {
        match self {
            CardStatus::Unset => CardStatus::New,
            other => other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CardStatus::Unset => "unset",
            CardStatus::New => "new",
            CardStatus::Learning => "learning",
            CardStatus::Reviewing => "reviewing",
            CardStatus::Mastered => "mastered",
        }
    }
}

impl TryFrom<u8> for CardStatus {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(CardStatus::Unset),
            1 => Ok(CardStatus::New),
            2 => Ok(CardStatus::Learning),
            3 => Ok(CardStatus::Reviewing),
            4 => Ok(CardStatus::Mastered),
            other => Err(format!("status must be between 0 and 4, got {}", other)),
        }
    }
}

impl From<CardStatus> for u8 {
    fn from(status: CardStatus) -> u8 {
        status.value()
    }
}

impl std::str::FromStr for CardStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "unset" => Ok(CardStatus::Unset),
            "1" | "new" => Ok(CardStatus::New),
            "2" | "learning" => Ok(CardStatus::Learning),
            "3" | "reviewing" => Ok(CardStatus::Reviewing),
            "4" | "mastered" => Ok(CardStatus::Mastered),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

impl std::fmt::Display for CardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: String,
    pub topic_id: String,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_html_content: Option<String>,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_content: Option<String>,
    pub is_bold: bool,
    pub is_italic: bool,
    pub text_color: String,
    pub id_order: i64,
    pub status: CardStatus,
    /// Set when the stored document had no `status` key.
    #[serde(skip)]
    pub status_missing: bool,
}

// Legacy documents may lack `status`, `idOrder` and the style keys.
impl<'de> Deserialize<'de> for Flashcard {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let helper = FlashcardHelper::deserialize(deserializer)?;

        Ok(Flashcard {
            id: helper.id,
            topic_id: helper.topic_id,
            question: helper.question,
            question_html_content: helper.question_html_content.filter(|h| !h.is_empty()),
            answer: helper.answer,
            html_content: helper.html_content.filter(|h| !h.is_empty()),
            is_bold: helper.is_bold,
            is_italic: helper.is_italic,
            text_color: helper
                .text_color
                .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
            id_order: helper.id_order,
            status_missing: helper.status.is_none(),
            status: helper.status.unwrap_or_default(),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlashcardHelper {
    id: String,
    topic_id: String,
    #[serde(default)]
    question: String,
    #[serde(default)]
    question_html_content: Option<String>,
    #[serde(default)]
    answer: String,
    #[serde(default)]
    html_content: Option<String>,
    #[serde(default)]
    is_bold: bool,
    #[serde(default)]
    is_italic: bool,
    #[serde(default)]
    text_color: Option<String>,
    #[serde(default)]
    id_order: i64,
    #[serde(default)]
    status: Option<CardStatus>,
}

/// Sorts cards into display order: ascending `idOrder`, ties broken by id.
pub fn sort_by_order(cards: &mut [Flashcard]) {
    cards.sort_by(|a, b| a.id_order.cmp(&b.id_order).then_with(|| a.id.cmp(&b.id)));
}

/// Shows only cards whose selected status button matches.
///
/// Filtering on `New` also shows `Unset` cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFilter(pub CardStatus);

impl StatusFilter {
    pub fn matches(&self, card: &Flashcard) -> bool {
        card.status.selected_button() == self.0.selected_button()
    }
}

/// Absolute positions in `cards` of the cards visible under `filter`.
pub fn visible_positions(cards: &[Flashcard], filter: Option<StatusFilter>) -> Vec<usize> {
    cards
        .iter()
        .enumerate()
        .filter(|(_, card)| filter.map_or(true, |f| f.matches(card)))
        .map(|(i, _)| i)
        .collect()
}

/// Colour band of a topic's success badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessBand {
    New,
    Learning,
    Reviewing,
    Mastered,
}

impl SuccessBand {
    pub fn from_average(average: f64) -> Self {
        if average <= 1.5 {
            SuccessBand::New
        } else if average <= 2.5 {
            SuccessBand::Learning
        } else if average <= 3.5 {
            SuccessBand::Reviewing
        } else {
            SuccessBand::Mastered
        }
    }
}
