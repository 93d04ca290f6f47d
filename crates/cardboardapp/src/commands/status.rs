//! Card status changes and the per-topic success average.
//!
//! The average is the mean of every card's effective status (Unset counts as
//! New) rounded half-up to two decimals. An empty topic averages `0`, and that
//! `0` is written like any other value so a stale average never survives the
//! last card.

use crate::error::Result;
use crate::model::{CardStatus, Flashcard};
use crate::store::{BatchReport, DataStore, FlashcardPatch, TopicPatch};

/// Result of changing one card's status.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub card: Flashcard,
    pub average: f64,
}

/// Mean effective status of `cards`, rounded to two decimals.
pub fn compute_success_average(cards: &[Flashcard]) -> f64 {
    if cards.is_empty() {
        return 0.0;
    }
    let sum: u64 = cards.iter().map(|c| u64::from(c.status.effective())).sum();
    round2(sum, cards.len() as u64)
}

/// `numerator / denominator` rounded half-up to two decimals.
///
/// Works in integer hundredths so results like `1.125` round to `1.13`
/// regardless of binary floating point.
pub fn round2(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let hundredths = (numerator * 200 + denominator) / (2 * denominator);
    hundredths as f64 / 100.0
}

/// Recomputes and persists the success average of `topic_id`.
pub fn recompute_success_average<S: DataStore>(store: &mut S, topic_id: &str) -> Result<f64> {
    let cards = store.list_flashcards(topic_id)?;
    let average = compute_success_average(&cards);
    store.update_topic(
        topic_id,
        &TopicPatch {
            success_average: Some(average),
            ..Default::default()
        },
    )?;
    tracing::debug!(topic = topic_id, cards = cards.len(), average, "success average recomputed");
    Ok(average)
}

/// Sets a card's status and recomputes the topic average.
///
/// Any status is reachable from any other.
pub fn set_card_status<S: DataStore>(
    store: &mut S,
    topic_id: &str,
    card_id: &str,
    status: CardStatus,
) -> Result<StatusChange> {
    let mut card = store.get_flashcard(topic_id, card_id)?;
    store.update_flashcard(topic_id, card_id, &FlashcardPatch::status(status))?;
    card.status = status;
    card.status_missing = false;
    tracing::debug!(topic = topic_id, card = card_id, %status, "card status set");

    let average = recompute_success_average(store, topic_id)?;
    Ok(StatusChange { card, average })
}

/// Persists `status = 0` for every card loaded without a status.
///
/// Cards whose write succeeded are unflagged in `cards`; the rest stay flagged
/// and are retried on the next load.
pub fn migrate_missing_status<S: DataStore>(
    store: &mut S,
    topic_id: &str,
    cards: &mut [Flashcard],
) -> BatchReport {
    let pending: Vec<String> = cards
        .iter()
        .filter(|c| c.status_missing)
        .map(|c| c.id.clone())
        .collect();
    if pending.is_empty() {
        return BatchReport::default();
    }

    let report = BatchReport::gather(pending, |id| {
        store.update_flashcard(topic_id, id, &FlashcardPatch::status(CardStatus::Unset))
    });
    for card in cards.iter_mut().filter(|c| report.has_succeeded(&c.id)) {
        card.status_missing = false;
    }
    if !report.is_complete() {
        tracing::warn!(
            topic = topic_id,
            failed = report.failed.len(),
            "status migration incomplete"
        );
    } else {
        tracing::info!(topic = topic_id, migrated = report.succeeded.len(), "card statuses migrated");
    }
    report
}
