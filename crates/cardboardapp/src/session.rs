//! # Topic Session
//!
//! In-memory view state for one open topic: its cards in display order, the
//! active status filter, and what the user is doing.
//!
//! ## Modes
//!
//! ```text
//!            start_learning            begin_edit
//! Browsing ──────────────▶ Learning ──────────────▶ Editing { resume: Some(pos) }
//!    ▲  ◀────────────────     ▲                         │
//!    │     stop_learning      └─────────────────────────┘
//!    │                           finish_edit / cancel_edit
//!    └──────── Editing { resume: None } ◀── begin_edit (from Browsing)
//! ```
//!
//! Editing from Learning keeps the learning position inside the `Editing`
//! state itself and restores it when the edit ends, so nothing about the
//! interrupted session lives outside this object.
//!
//! ## Mirroring Store Outcomes
//!
//! The session never writes to a store. After a command runs, the caller feeds
//! its outcome to the matching `apply_*` method. Batch outcomes are mirrored
//! only for the writes that succeeded.
//!
//! Once [`TopicSession::close`] is called, late outcomes are dropped.

use crate::commands::flashcards::{CardChange, CardRemoval, TopicCards};
use crate::commands::import::ImportOutcome;
use crate::commands::ordering::ReorderOutcome;
use crate::commands::status::StatusChange;
use crate::error::{CardboardError, Result};
use crate::model::{sort_by_order, Flashcard, StatusFilter, Topic};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningPosition {
    pub card_id: String,
    pub answer_shown: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browsing,
    /// `card_id` is `None` while composing a new card.
    Editing {
        card_id: Option<String>,
        resume: Option<LearningPosition>,
    },
    Learning(LearningPosition),
}

#[derive(Debug)]
pub struct TopicSession {
    topic: Topic,
    cards: Vec<Flashcard>,
    filter: Option<StatusFilter>,
    mode: Mode,
    closed: bool,
}

impl TopicSession {
    pub fn new(loaded: TopicCards) -> Self {
        Self::from_parts(loaded.topic, loaded.cards)
    }

    /// `cards` are expected in display order.
    pub fn from_parts(topic: Topic, cards: Vec<Flashcard>) -> Self {
        Self {
            topic,
            cards,
            filter: None,
            mode: Mode::Browsing,
            closed: false,
        }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Every card, in display order.
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn filter(&self) -> Option<StatusFilter> {
        self.filter
    }

    /// Cards shown under the current filter.
    pub fn visible_cards(&self) -> Vec<&Flashcard> {
        self.cards.iter().filter(|c| self.is_visible(c)).collect()
    }

    fn is_visible(&self, card: &Flashcard) -> bool {
        self.filter.map_or(true, |f| f.matches(card))
    }

    fn visible_ids(&self) -> Vec<String> {
        self.visible_cards().into_iter().map(|c| c.id.clone()).collect()
    }

    fn card(&self, id: &str) -> Option<&Flashcard> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Changes the filter. A learning session whose card is hidden by the new
    /// filter jumps to the first visible card, or stops if there is none.
    pub fn set_filter(&mut self, filter: Option<StatusFilter>) {
        self.filter = filter;
        self.keep_learning_on_visible_card();
    }

    fn keep_learning_on_visible_card(&mut self) {
        let Mode::Learning(pos) = &self.mode else {
            return;
        };
        let still_visible = self.card(&pos.card_id).is_some_and(|c| self.is_visible(c));
        if still_visible {
            return;
        }
        self.mode = match self.visible_ids().into_iter().next() {
            Some(card_id) => Mode::Learning(LearningPosition {
                card_id,
                answer_shown: false,
            }),
            None => Mode::Browsing,
        };
    }

    // --- Learning ---

    /// Starts at the first visible card with its answer hidden.
    ///
    /// Stays in Browsing and returns `None` when no card is visible.
    pub fn start_learning(&mut self) -> Option<&Flashcard> {
        let card_id = self.visible_ids().into_iter().next()?;
        self.mode = Mode::Learning(LearningPosition {
            card_id,
            answer_shown: false,
        });
        self.current_card()
    }

    /// The card being learned.
    pub fn current_card(&self) -> Option<&Flashcard> {
        match &self.mode {
            Mode::Learning(pos) => self.card(&pos.card_id),
            _ => None,
        }
    }

    pub fn answer_shown(&self) -> bool {
        matches!(&self.mode, Mode::Learning(pos) if pos.answer_shown)
    }

    pub fn reveal_answer(&mut self) {
        if let Mode::Learning(pos) = &mut self.mode {
            pos.answer_shown = true;
        }
    }

    /// Advances to the next visible card, wrapping after the last one.
    pub fn next_card(&mut self) -> Option<&Flashcard> {
        let Mode::Learning(pos) = &self.mode else {
            return None;
        };
        let visible = self.visible_ids();
        let next = match visible.iter().position(|id| *id == pos.card_id) {
            Some(i) => visible.get((i + 1) % visible.len()).cloned(),
            None => visible.first().cloned(),
        };
        self.mode = match next {
            Some(card_id) => Mode::Learning(LearningPosition {
                card_id,
                answer_shown: false,
            }),
            None => Mode::Browsing,
        };
        self.current_card()
    }

    pub fn stop_learning(&mut self) {
        if matches!(self.mode, Mode::Learning(_)) {
            self.mode = Mode::Browsing;
        }
    }

    // --- Editing ---

    /// Opens the editor for `card_id`, or for a new card when `None`.
    ///
    /// Entering from Learning remembers the learning position.
    pub fn begin_edit(&mut self, card_id: Option<&str>) -> Result<()> {
        if let Some(id) = card_id {
            if self.card(id).is_none() {
                return Err(CardboardError::FlashcardNotFound(id.to_string()));
            }
        }
        let resume = match &self.mode {
            Mode::Browsing => None,
            Mode::Learning(pos) => Some(pos.clone()),
            Mode::Editing { .. } => {
                return Err(CardboardError::Validation("an edit is already in progress".into()))
            }
        };
        self.mode = Mode::Editing {
            card_id: card_id.map(str::to_string),
            resume,
        };
        Ok(())
    }

    /// Applies the saved card and returns to where the edit started.
    pub fn finish_edit(&mut self, change: CardChange) {
        self.apply_card_change(change);
        self.end_edit();
    }

    /// Leaves the editor without changes.
    pub fn cancel_edit(&mut self) {
        self.end_edit();
    }

    fn end_edit(&mut self) {
        let Mode::Editing { resume, .. } = &self.mode else {
            return;
        };
        self.mode = match resume {
            Some(pos) if self.card(&pos.card_id).is_some() => Mode::Learning(pos.clone()),
            _ => Mode::Browsing,
        };
        self.keep_learning_on_visible_card();
    }

    // --- Mirroring ---

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn accepting(&self, what: &str) -> bool {
        if self.closed {
            tracing::debug!(topic = %self.topic.id, what, "ignoring update for closed session");
        }
        !self.closed
    }

    /// Inserts a created card or replaces an edited one.
    pub fn apply_card_change(&mut self, change: CardChange) {
        if !self.accepting("card change") {
            return;
        }
        let CardChange { card, average } = change;
        match self.cards.iter_mut().find(|c| c.id == card.id) {
            Some(existing) => *existing = card,
            None => self.cards.push(card),
        }
        self.topic.success_average = Some(average);
    }

    /// Records a new status. If that hides the card being learned, learning
    /// moves to the visible card that followed it.
    pub fn apply_status(&mut self, change: StatusChange) {
        if !self.accepting("status change") {
            return;
        }
        let successor = match &self.mode {
            Mode::Learning(pos) if pos.card_id == change.card.id => {
                Some(self.next_visible_after(&pos.card_id))
            }
            _ => None,
        };
        if let Some(card) = self.cards.iter_mut().find(|c| c.id == change.card.id) {
            card.status = change.card.status;
            card.status_missing = false;
        }
        self.topic.success_average = Some(change.average);

        let hidden = self.current_card().is_some_and(|c| !self.is_visible(c));
        match successor {
            Some(next) if hidden => {
                self.mode = next.map_or(Mode::Browsing, |card_id| {
                    Mode::Learning(LearningPosition {
                        card_id,
                        answer_shown: false,
                    })
                });
            }
            _ => self.keep_learning_on_visible_card(),
        }
    }

    pub fn apply_average(&mut self, average: f64) {
        if self.accepting("average") {
            self.topic.success_average = Some(average);
        }
    }

    /// Adopts the new card sequence. Cards whose order write failed keep
    /// their previous `idOrder` value.
    pub fn apply_reorder(&mut self, outcome: &ReorderOutcome) {
        if !self.accepting("reorder") {
            return;
        }
        let mut reordered = Vec::with_capacity(outcome.cards.len());
        for target in &outcome.cards {
            let Some(current) = self.card(&target.id) else {
                continue;
            };
            let mut card = current.clone();
            if outcome.batch.has_succeeded(&card.id) {
                card.id_order = target.id_order;
            }
            reordered.push(card);
        }
        // Cards the outcome does not know about stay at the end.
        for card in &self.cards {
            if !outcome.cards.iter().any(|t| t.id == card.id) {
                reordered.push(card.clone());
            }
        }
        self.cards = reordered;
    }

    /// Drops a deleted card. A learning position on that card moves to the
    /// next visible card, and an open editor for it closes.
    pub fn apply_deleted(&mut self, removal: &CardRemoval) {
        if !self.accepting("delete") {
            return;
        }
        let removed = removal.removed_id.as_str();
        let successor = self.next_visible_after(removed);

        self.cards.retain(|c| c.id != removed);
        self.apply_reorder(&removal.reorder);
        self.topic.success_average = Some(removal.average);

        let relocate = |pos: &LearningPosition| -> Option<LearningPosition> {
            if pos.card_id != removed {
                return Some(pos.clone());
            }
            successor.clone().map(|card_id| LearningPosition {
                card_id,
                answer_shown: false,
            })
        };
        self.mode = match &self.mode {
            Mode::Browsing => Mode::Browsing,
            Mode::Learning(pos) => relocate(pos).map_or(Mode::Browsing, Mode::Learning),
            Mode::Editing { card_id, resume } => {
                let resume = resume.as_ref().and_then(relocate);
                if card_id.as_deref() == Some(removed) {
                    resume.map_or(Mode::Browsing, Mode::Learning)
                } else {
                    Mode::Editing {
                        card_id: card_id.clone(),
                        resume,
                    }
                }
            }
        };
    }

    /// The visible card after `id`, wrapping; `None` if `id` is the only one.
    fn next_visible_after(&self, id: &str) -> Option<String> {
        let visible = self.visible_ids();
        let next = match visible.iter().position(|v| v == id) {
            Some(i) => visible.get((i + 1) % visible.len()),
            None => visible.first(),
        };
        next.filter(|n| *n != id).cloned()
    }

    pub fn apply_import(&mut self, outcome: &ImportOutcome) {
        if !self.accepting("import") {
            return;
        }
        self.cards.extend(outcome.created.iter().cloned());
        // Imported cards may carry their own idOrder.
        sort_by_order(&mut self.cards);
        if let Some(average) = outcome.average {
            self.topic.success_average = Some(average);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::flashcards::{self, NewFlashcard};
    use crate::commands::{import, ordering, status};
    use crate::model::CardStatus;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    const M: CardStatus = CardStatus::Mastered;
    const N: CardStatus = CardStatus::New;

    fn setup(cards: &[(&str, CardStatus)]) -> (InMemoryStore, TopicSession) {
        let mut store = StoreFixture::new()
            .with_space("s", "", 0)
            .with_topic("t", "s")
            .with_cards("t", cards)
            .build();
        let session = TopicSession::new(flashcards::load(&mut store, "t").unwrap());
        (store, session)
    }

    fn ids(cards: &[Flashcard]) -> Vec<&str> {
        cards.iter().map(|c| c.id.as_str()).collect()
    }

    fn current_id(session: &TopicSession) -> Option<String> {
        session.current_card().map(|c| c.id.clone())
    }

    #[test]
    fn learning_walks_visible_cards_and_wraps() {
        let (_, mut session) = setup(&[("a", N), ("b", M), ("c", N)]);
        session.set_filter(Some(StatusFilter(N)));

        assert_eq!(session.start_learning().map(|c| c.id.clone()), Some("a".into()));
        assert!(!session.answer_shown());
        session.reveal_answer();
        assert!(session.answer_shown());

        assert_eq!(session.next_card().map(|c| c.id.clone()), Some("c".into()));
        assert!(!session.answer_shown());
        assert_eq!(session.next_card().map(|c| c.id.clone()), Some("a".into()));

        session.stop_learning();
        assert_eq!(session.mode(), &Mode::Browsing);
    }

    #[test]
    fn learning_needs_a_visible_card() {
        let (_, mut session) = setup(&[("a", N)]);
        session.set_filter(Some(StatusFilter(M)));
        assert!(session.start_learning().is_none());
        assert_eq!(session.mode(), &Mode::Browsing);
    }

    #[test]
    fn edit_from_learning_restores_position() {
        let (mut store, mut session) = setup(&[("a", N), ("b", N)]);
        session.start_learning();
        session.next_card();
        session.reveal_answer();

        session.begin_edit(Some("b")).unwrap();
        assert!(matches!(session.mode(), Mode::Editing { resume: Some(_), .. }));

        let change = flashcards::edit(&mut store, "t", "b", NewFlashcard::plain("B?", "B!")).unwrap();
        session.finish_edit(change);
        assert_eq!(
            session.mode(),
            &Mode::Learning(LearningPosition {
                card_id: "b".into(),
                answer_shown: true
            })
        );
        assert_eq!(session.current_card().unwrap().question, "B?");
    }

    #[test]
    fn cancelled_edit_from_browsing_returns_to_browsing() {
        let (_, mut session) = setup(&[("a", N)]);
        session.begin_edit(None).unwrap();
        assert!(session.begin_edit(None).is_err());
        session.cancel_edit();
        assert_eq!(session.mode(), &Mode::Browsing);
        assert!(session.begin_edit(Some("ghost")).unwrap_err().is_not_found());
    }

    #[test]
    fn created_card_is_appended() {
        let (mut store, mut session) = setup(&[("a", M)]);
        session.begin_edit(None).unwrap();
        let change = flashcards::create(&mut store, "t", NewFlashcard::plain("Q", "A")).unwrap();
        session.finish_edit(change);

        assert_eq!(session.cards().len(), 2);
        assert_eq!(session.cards()[1].id_order, 2);
        assert_eq!(session.topic().success_average, Some(2.5));
    }

    #[test]
    fn filtered_reorder_mirrors_full_sequence() {
        let (mut store, mut session) =
            setup(&[("M1", M), ("N1", N), ("M2", M), ("N2", N), ("M3", M)]);
        session.set_filter(Some(StatusFilter(M)));

        let outcome = ordering::move_card(&mut store, "t", session.filter(), 2, 0).unwrap();
        session.apply_reorder(&outcome);
        assert_eq!(ids(session.cards()), vec!["M3", "M1", "N1", "M2", "N2"]);
        let orders: Vec<i64> = session.cards().iter().map(|c| c.id_order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn failed_order_writes_keep_old_values() {
        let (mut store, mut session) = setup(&[("a", N), ("b", N), ("c", N)]);
        store.backend().fail_writes_for("c");

        let outcome = ordering::move_card(&mut store, "t", None, 2, 0).unwrap();
        session.apply_reorder(&outcome);
        assert_eq!(ids(session.cards()), vec!["c", "a", "b"]);
        let orders: Vec<i64> = session.cards().iter().map(|c| c.id_order).collect();
        assert_eq!(orders, vec![3, 2, 3]);
    }

    #[test]
    fn deleting_current_learning_card_moves_on() {
        let (mut store, mut session) = setup(&[("a", N), ("b", N), ("c", N)]);
        session.start_learning();
        session.next_card();
        assert_eq!(current_id(&session), Some("b".into()));

        let removal = flashcards::delete(&mut store, "t", "b").unwrap();
        session.apply_deleted(&removal);
        assert_eq!(current_id(&session), Some("c".into()));
        assert_eq!(ids(session.cards()), vec!["a", "c"]);
        let orders: Vec<i64> = session.cards().iter().map(|c| c.id_order).collect();
        assert_eq!(orders, vec![1, 2]);
    }

    #[test]
    fn deleting_only_card_stops_learning() {
        let (mut store, mut session) = setup(&[("a", N)]);
        session.start_learning();
        let removal = flashcards::delete(&mut store, "t", "a").unwrap();
        session.apply_deleted(&removal);
        assert_eq!(session.mode(), &Mode::Browsing);
        assert_eq!(session.topic().success_average, Some(0.0));
    }

    #[test]
    fn status_change_can_hide_current_card() {
        let (mut store, mut session) = setup(&[("a", N), ("b", N)]);
        session.set_filter(Some(StatusFilter(N)));
        session.start_learning();

        let change = status::set_card_status(&mut store, "t", "a", M).unwrap();
        session.apply_status(change);
        assert_eq!(current_id(&session), Some("b".into()));
        assert_eq!(session.topic().success_average, Some(2.5));
    }

    #[test]
    fn import_appends_created_cards() {
        let (mut store, mut session) = setup(&[("a", N)]);
        let outcome = import::run(
            &mut store,
            "t",
            r#"{"cards": [{"question": "Q", "answer": "A", "status": 4}]}"#,
        )
        .unwrap();
        session.apply_import(&outcome);
        assert_eq!(session.cards().len(), 2);
        assert_eq!(session.topic().success_average, Some(2.5));
    }

    #[test]
    fn hiding_current_card_moves_to_the_following_one() {
        let (mut store, mut session) = setup(&[("m1", M), ("m2", M), ("m3", M)]);
        session.set_filter(Some(StatusFilter(M)));
        session.start_learning();
        session.next_card();
        assert_eq!(current_id(&session), Some("m2".into()));

        let change = status::set_card_status(&mut store, "t", "m2", N).unwrap();
        session.apply_status(change);
        assert_eq!(current_id(&session), Some("m3".into()));
        assert!(!session.answer_shown());

        // The last visible card wraps to the first.
        let change = status::set_card_status(&mut store, "t", "m3", N).unwrap();
        session.apply_status(change);
        assert_eq!(current_id(&session), Some("m1".into()));

        let change = status::set_card_status(&mut store, "t", "m1", N).unwrap();
        session.apply_status(change);
        assert_eq!(session.mode(), &Mode::Browsing);
    }

    #[test]
    fn import_with_explicit_order_keeps_display_order() {
        let (mut store, mut session) = setup(&[("a", N), ("b", N)]);
        let outcome = import::run(
            &mut store,
            "t",
            r#"{"cards": [{"question": "Q", "answer": "A", "idOrder": 1}]}"#,
        )
        .unwrap();
        session.apply_import(&outcome);

        let stored = ordering::ordered_cards(&store, "t").unwrap();
        assert_eq!(ids(session.cards()), ids(&stored));
        let orders: Vec<i64> = session.cards().iter().map(|c| c.id_order).collect();
        assert_eq!(orders, vec![1, 1, 2]);
    }

    #[test]
    fn closed_session_ignores_late_outcomes() {
        let (mut store, mut session) = setup(&[("a", N)]);
        let change = flashcards::create(&mut store, "t", NewFlashcard::plain("Q", "A")).unwrap();
        session.close();

        session.apply_card_change(change);
        session.apply_average(3.0);
        assert!(session.is_closed());
        assert_eq!(session.cards().len(), 1);
        assert_eq!(session.topic().success_average, None);
    }
}
