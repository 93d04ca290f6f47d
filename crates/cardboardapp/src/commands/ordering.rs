//! # Ordering Engine
//!
//! Cards in a topic form a dense 1-based sequence on `idOrder`. Creation
//! appends at `max + 1`; every other mutation renumbers.
//!
//! ## Filtered Reorders
//!
//! Drag indices come from the list the user sees, which may be narrowed by a
//! [`StatusFilter`]. They are always translated to positions in the full list
//! before moving anything:
//!
//! ```text
//! full:     [M1, N1, M2, N2, M3]      filter = Mastered
//! visible:  [M1, M2, M3]              drag visible 2 -> 0
//! abs:      from = 4, to = 0
//! result:   [M3, M1, N1, M2, N2]
//! ```
//!
//! Moving only inside the visible subset and renumbering it would hand the
//! hidden cards duplicate or shifted positions.
//!
//! ## Persistence
//!
//! Reorders write every card's `idOrder` as a batch of independent updates.
//! A partial failure leaves the stored sequence uneven until the next reorder
//! rewrites it; [`ReorderOutcome::batch`] names the cards that did not update.

use crate::error::{CardboardError, Result};
use crate::model::{sort_by_order, visible_positions, Flashcard, StatusFilter};
use crate::store::{BatchReport, DataStore, FlashcardPatch};
use std::collections::HashSet;

/// The intended sequence after a reorder and what actually got written.
#[derive(Debug)]
pub struct ReorderOutcome {
    /// Every card of the topic in its new order, `idOrder` renumbered `1..N`.
    pub cards: Vec<Flashcard>,
    pub batch: BatchReport,
}

/// `idOrder` for a card appended to `cards`.
pub fn next_order(cards: &[Flashcard]) -> i64 {
    cards.iter().map(|c| c.id_order).max().unwrap_or(0) + 1
}

/// The topic's cards in display order.
pub fn ordered_cards<S: DataStore>(store: &S, topic_id: &str) -> Result<Vec<Flashcard>> {
    let mut cards = store.list_flashcards(topic_id)?;
    sort_by_order(&mut cards);
    Ok(cards)
}

/// Moves the card at visible index `from` to visible index `to`, in place.
///
/// Indices are mapped onto the full list first; see the module docs.
pub fn move_within(
    cards: &mut Vec<Flashcard>,
    filter: Option<StatusFilter>,
    from: usize,
    to: usize,
) -> Result<()> {
    let visible = visible_positions(cards, filter);
    let (abs_from, abs_to) = match (visible.get(from), visible.get(to)) {
        (Some(&f), Some(&t)) => (f, t),
        _ => {
            return Err(CardboardError::Validation(format!(
                "cannot move from {} to {}: only {} cards are visible",
                from,
                to,
                visible.len()
            )))
        }
    };
    let card = cards.remove(abs_from);
    cards.insert(abs_to, card);
    Ok(())
}

/// Renumbers `cards` to `1..N` in slice order, returning the ids whose
/// `idOrder` changed.
pub fn renumber(cards: &mut [Flashcard]) -> Vec<String> {
    let mut changed = Vec::new();
    for (i, card) in cards.iter_mut().enumerate() {
        let order = i as i64 + 1;
        if card.id_order != order {
            card.id_order = order;
            changed.push(card.id.clone());
        }
    }
    changed
}

fn write_orders<S: DataStore>(
    store: &mut S,
    topic_id: &str,
    cards: &[Flashcard],
    ids: Vec<String>,
) -> BatchReport {
    let report = BatchReport::gather(ids, |id| {
        let order = cards
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.id_order)
            .ok_or_else(|| CardboardError::FlashcardNotFound(id.to_string()))?;
        store.update_flashcard(topic_id, id, &FlashcardPatch::order(order))
    });
    if !report.is_complete() {
        tracing::warn!(
            topic = topic_id,
            failed = report.failed.len(),
            written = report.succeeded.len(),
            "order write incomplete"
        );
    }
    report
}

fn rewrite_all<S: DataStore>(
    store: &mut S,
    topic_id: &str,
    mut cards: Vec<Flashcard>,
) -> ReorderOutcome {
    renumber(&mut cards);
    let ids = cards.iter().map(|c| c.id.clone()).collect();
    let batch = write_orders(store, topic_id, &cards, ids);
    tracing::debug!(topic = topic_id, cards = cards.len(), "cards reordered");
    ReorderOutcome { cards, batch }
}

/// Drag reorder: moves visible index `from` to visible index `to` and writes
/// the whole renumbered sequence.
pub fn move_card<S: DataStore>(
    store: &mut S,
    topic_id: &str,
    filter: Option<StatusFilter>,
    from: usize,
    to: usize,
) -> Result<ReorderOutcome> {
    store.get_topic(topic_id)?;
    let mut cards = ordered_cards(store, topic_id)?;
    move_within(&mut cards, filter, from, to)?;
    Ok(rewrite_all(store, topic_id, cards))
}

/// Puts the named cards first, in the given order; unnamed cards follow in
/// their previous relative order.
///
/// Unknown ids fail before anything is written. Repeated ids count once.
pub fn reorder_by_ids<S: DataStore>(
    store: &mut S,
    topic_id: &str,
    ordered_ids: &[String],
) -> Result<ReorderOutcome> {
    store.get_topic(topic_id)?;
    let mut remaining = ordered_cards(store, topic_id)?;

    if let Some(unknown) = ordered_ids
        .iter()
        .find(|id| !remaining.iter().any(|c| &c.id == *id))
    {
        return Err(CardboardError::FlashcardNotFound(unknown.clone()));
    }

    let mut seen = HashSet::new();
    let mut cards = Vec::with_capacity(remaining.len());
    for id in ordered_ids {
        if !seen.insert(id.as_str()) {
            continue;
        }
        if let Some(pos) = remaining.iter().position(|c| &c.id == id) {
            cards.push(remaining.remove(pos));
        }
    }
    cards.append(&mut remaining);

    Ok(rewrite_all(store, topic_id, cards))
}

/// Closes gaps left by deletions, writing only cards whose `idOrder` moved.
pub fn compact<S: DataStore>(store: &mut S, topic_id: &str) -> Result<ReorderOutcome> {
    let mut cards = ordered_cards(store, topic_id)?;
    let changed = renumber(&mut cards);
    let batch = write_orders(store, topic_id, &cards, changed);
    Ok(ReorderOutcome { cards, batch })
}
