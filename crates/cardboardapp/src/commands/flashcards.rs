//! Flashcard create, edit, delete, and topic loading.
//!
//! Every mutation here ends with a success-average recompute. Loading a topic
//! also persists `status = 0` for legacy cards stored without a status.

use super::ordering::{self, ReorderOutcome};
use super::status::{migrate_missing_status, recompute_success_average};
use crate::error::{CardboardError, Result};
use crate::model::{is_hex_color, new_id, CardStatus, Flashcard, Topic, DEFAULT_TEXT_COLOR};
use crate::richtext::RichText;
use crate::store::{BatchReport, DataStore, FlashcardPatch};

/// Content and style of a card being created or edited.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFlashcard {
    pub question: String,
    pub question_html_content: Option<String>,
    pub answer: String,
    pub html_content: Option<String>,
    pub is_bold: bool,
    pub is_italic: bool,
    pub text_color: String,
}

impl NewFlashcard {
    pub fn plain(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            question_html_content: None,
            answer: answer.into(),
            html_content: None,
            is_bold: false,
            is_italic: false,
            text_color: DEFAULT_TEXT_COLOR.to_string(),
        }
    }

    /// Plain text goes to `question`/`answer`, rendered HTML alongside.
    pub fn from_rich(question: &RichText, answer: &RichText) -> Self {
        Self {
            question: question.plain_text(),
            question_html_content: non_empty(question.to_html()),
            answer: answer.plain_text(),
            html_content: non_empty(answer.to_html()),
            ..Self::plain("", "")
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.question.trim().is_empty() {
            return Err(CardboardError::Validation("question must not be empty".into()));
        }
        let has_html = self.html_content.as_deref().is_some_and(|h| !h.is_empty());
        if self.answer.trim().is_empty() && !has_html {
            return Err(CardboardError::Validation("answer must not be empty".into()));
        }
        if !is_hex_color(&self.text_color) {
            return Err(CardboardError::Validation(format!(
                "text color '{}' is not a #RGB or #RRGGBB value",
                self.text_color
            )));
        }
        Ok(())
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// A card written by create or edit, with the topic's new average.
#[derive(Debug, Clone, PartialEq)]
pub struct CardChange {
    pub card: Flashcard,
    pub average: f64,
}

/// Outcome of deleting a card.
#[derive(Debug)]
pub struct CardRemoval {
    pub removed_id: String,
    /// The remaining cards after compaction.
    pub reorder: ReorderOutcome,
    pub average: f64,
}

/// A topic ready for display: ordered cards with legacy statuses migrated.
#[derive(Debug)]
pub struct TopicCards {
    pub topic: Topic,
    pub cards: Vec<Flashcard>,
    pub migration: BatchReport,
}

/// Appends a new card at `max(idOrder) + 1` with status Unset.
pub fn create<S: DataStore>(store: &mut S, topic_id: &str, new: NewFlashcard) -> Result<CardChange> {
    new.validate()?;
    store.get_topic(topic_id)?;
    let existing = store.list_flashcards(topic_id)?;

    let card = Flashcard {
        id: new_id(),
        topic_id: topic_id.to_string(),
        question: new.question,
        question_html_content: new.question_html_content,
        answer: new.answer,
        html_content: new.html_content,
        is_bold: new.is_bold,
        is_italic: new.is_italic,
        text_color: new.text_color,
        id_order: ordering::next_order(&existing),
        status: CardStatus::Unset,
        status_missing: false,
    };
    store.save_flashcard(&card)?;
    tracing::debug!(topic = topic_id, card = %card.id, order = card.id_order, "flashcard created");

    let average = recompute_success_average(store, topic_id)?;
    Ok(CardChange { card, average })
}

/// Replaces content and style; `status` and `idOrder` are kept.
pub fn edit<S: DataStore>(
    store: &mut S,
    topic_id: &str,
    card_id: &str,
    new: NewFlashcard,
) -> Result<CardChange> {
    new.validate()?;
    let existing = store.get_flashcard(topic_id, card_id)?;

    let patch = FlashcardPatch {
        question: Some(new.question.clone()),
        question_html_content: Some(new.question_html_content.clone().unwrap_or_default()),
        answer: Some(new.answer.clone()),
        html_content: Some(new.html_content.clone().unwrap_or_default()),
        is_bold: Some(new.is_bold),
        is_italic: Some(new.is_italic),
        text_color: Some(new.text_color.clone()),
        ..Default::default()
    };
    store.update_flashcard(topic_id, card_id, &patch)?;
    tracing::debug!(topic = topic_id, card = card_id, "flashcard edited");

    let card = Flashcard {
        question: new.question,
        question_html_content: new.question_html_content,
        answer: new.answer,
        html_content: new.html_content,
        is_bold: new.is_bold,
        is_italic: new.is_italic,
        text_color: new.text_color,
        ..existing
    };
    let average = recompute_success_average(store, topic_id)?;
    Ok(CardChange { card, average })
}

/// Removes a card, closes the gap in `idOrder` and recomputes the average.
pub fn delete<S: DataStore>(store: &mut S, topic_id: &str, card_id: &str) -> Result<CardRemoval> {
    store.get_flashcard(topic_id, card_id)?;
    store.delete_flashcard(topic_id, card_id)?;
    tracing::debug!(topic = topic_id, card = card_id, "flashcard deleted");

    let reorder = ordering::compact(store, topic_id)?;
    let average = recompute_success_average(store, topic_id)?;
    Ok(CardRemoval {
        removed_id: card_id.to_string(),
        reorder,
        average,
    })
}

/// Loads a topic and its ordered cards, migrating missing statuses.
pub fn load<S: DataStore>(store: &mut S, topic_id: &str) -> Result<TopicCards> {
    let topic = store.get_topic(topic_id)?;
    let mut cards = ordering::ordered_cards(store, topic_id)?;
    let migration = migrate_missing_status(store, topic_id, &mut cards);
    Ok(TopicCards {
        topic,
        cards,
        migration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::Style;
    use crate::store::backend::{Collection, DocumentBackend};
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;
    use serde_json::json;

    fn store_with(cards: &[(&str, CardStatus)]) -> InMemoryStore {
        StoreFixture::new()
            .with_space("s", "", 0)
            .with_topic("t", "s")
            .with_cards("t", cards)
            .build()
    }

    fn orders(store: &InMemoryStore) -> Vec<i64> {
        ordering::ordered_cards(store, "t")
            .unwrap()
            .iter()
            .map(|c| c.id_order)
            .collect()
    }

    #[test]
    fn create_appends_with_unset_status() {
        let mut store = store_with(&[("a", CardStatus::Mastered), ("b", CardStatus::Mastered)]);

        let change = create(&mut store, "t", NewFlashcard::plain("Q", "A")).unwrap();
        assert_eq!(change.card.id_order, 3);
        assert_eq!(change.card.status, CardStatus::Unset);
        // (4 + 4 + 1) / 3
        assert_eq!(change.average, 3.0);

        let stored = store.get_flashcard("t", &change.card.id).unwrap();
        assert_eq!(stored, change.card);
    }

    #[test]
    fn create_in_empty_topic_starts_at_one() {
        let mut store = store_with(&[]);
        let change = create(&mut store, "t", NewFlashcard::plain("Q", "A")).unwrap();
        assert_eq!(change.card.id_order, 1);
        assert_eq!(change.average, 1.0);
    }

    #[test]
    fn create_validates_content() {
        let mut store = store_with(&[]);
        assert!(matches!(
            create(&mut store, "t", NewFlashcard::plain("  ", "A")),
            Err(CardboardError::Validation(_))
        ));
        assert!(matches!(
            create(&mut store, "t", NewFlashcard::plain("Q", "")),
            Err(CardboardError::Validation(_))
        ));

        let html_only = NewFlashcard {
            html_content: Some("<b>A</b>".into()),
            ..NewFlashcard::plain("Q", "")
        };
        assert!(create(&mut store, "t", html_only).is_ok());

        let bad_color = NewFlashcard {
            text_color: "red".into(),
            ..NewFlashcard::plain("Q", "A")
        };
        assert!(create(&mut store, "t", bad_color).is_err());
    }

    #[test]
    fn create_in_missing_topic_is_not_found() {
        let mut store = store_with(&[]);
        let err = create(&mut store, "ghost", NewFlashcard::plain("Q", "A")).unwrap_err();
        assert!(matches!(err, CardboardError::TopicNotFound(_)));
    }

    #[test]
    fn create_from_rich_text_stores_plain_and_html() {
        let mut store = store_with(&[]);
        let mut answer = RichText::from_plain("Paris");
        answer.toggle_bold(0..5);
        let new = NewFlashcard::from_rich(&RichText::from_plain("Capital?"), &answer);

        let change = create(&mut store, "t", new).unwrap();
        assert_eq!(change.card.answer, "Paris");
        assert_eq!(change.card.html_content.as_deref(), Some("<b>Paris</b>"));
        assert_eq!(change.card.question_html_content.as_deref(), Some("Capital?"));
        assert_eq!(answer.runs()[0].style, Style { bold: true, ..Style::default() });
    }

    #[test]
    fn edit_keeps_status_and_order() {
        let mut store = store_with(&[("a", CardStatus::New), ("b", CardStatus::Reviewing)]);

        let new = NewFlashcard {
            is_italic: true,
            text_color: "#00ff00".into(),
            ..NewFlashcard::plain("New Q", "New A")
        };
        let change = edit(&mut store, "t", "b", new).unwrap();
        assert_eq!(change.card.status, CardStatus::Reviewing);
        assert_eq!(change.card.id_order, 2);
        assert_eq!(change.average, 2.0);

        let stored = store.get_flashcard("t", "b").unwrap();
        assert_eq!(stored.question, "New Q");
        assert!(stored.is_italic);
        assert_eq!(stored.text_color, "#00ff00");
        assert_eq!(stored.status, CardStatus::Reviewing);
        assert_eq!(stored.id_order, 2);
    }

    #[test]
    fn edit_clears_previous_html() {
        let mut store = store_with(&[]);
        let rich = NewFlashcard {
            html_content: Some("<i>A</i>".into()),
            ..NewFlashcard::plain("Q", "A")
        };
        let id = create(&mut store, "t", rich).unwrap().card.id;

        edit(&mut store, "t", &id, NewFlashcard::plain("Q", "B")).unwrap();
        assert_eq!(store.get_flashcard("t", &id).unwrap().html_content, None);
    }

    #[test]
    fn delete_compacts_orders() {
        let mut store = store_with(&[
            ("a", CardStatus::New),
            ("b", CardStatus::New),
            ("c", CardStatus::Mastered),
        ]);

        let removal = delete(&mut store, "t", "a").unwrap();
        assert_eq!(removal.removed_id, "a");
        assert_eq!(orders(&store), vec![1, 2]);
        assert_eq!(removal.average, 2.5);
        let ids: Vec<&str> = removal.reorder.cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn deleting_last_card_resets_average_to_zero() {
        let mut store = store_with(&[("only", CardStatus::Mastered)]);
        recompute_success_average(&mut store, "t").unwrap();
        assert_eq!(store.get_topic("t").unwrap().success_average, Some(4.0));

        let removal = delete(&mut store, "t", "only").unwrap();
        assert_eq!(removal.average, 0.0);
        assert_eq!(store.get_topic("t").unwrap().success_average, Some(0.0));
    }

    #[test]
    fn create_delete_sequences_stay_dense() {
        let mut store = store_with(&[]);
        let mut ids = Vec::new();
        for i in 0..5 {
            let q = format!("Q{}", i);
            ids.push(create(&mut store, "t", NewFlashcard::plain(q, "A")).unwrap().card.id);
        }
        delete(&mut store, "t", &ids[1]).unwrap();
        delete(&mut store, "t", &ids[3]).unwrap();
        create(&mut store, "t", NewFlashcard::plain("late", "A")).unwrap();
        delete(&mut store, "t", &ids[0]).unwrap();

        assert_eq!(orders(&store), vec![1, 2, 3]);
    }

    #[test]
    fn load_migrates_and_orders() {
        let mut store = store_with(&[("a", CardStatus::Learning), ("b", CardStatus::New)]);
        let legacy = json!({"question": "Q", "answer": "A", "idOrder": 0});
        store
            .backend()
            .set(&Collection::flashcards("t"), "legacy", legacy.as_object().unwrap())
            .unwrap();

        let loaded = load(&mut store, "t").unwrap();
        let ids: Vec<&str> = loaded.cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["legacy", "a", "b"]);
        assert_eq!(loaded.migration.succeeded, vec!["legacy"]);
        assert!(!store.get_flashcard("t", "legacy").unwrap().status_missing);
    }

    #[test]
    fn load_missing_topic_is_not_found() {
        let mut store = store_with(&[]);
        assert!(load(&mut store, "ghost").unwrap_err().is_not_found());
    }
}
