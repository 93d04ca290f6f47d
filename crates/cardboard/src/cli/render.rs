//! Turns API results into terminal text.
//!
//! Every function returns a `String` so commands decide where it goes, and
//! tests can check layout without a terminal.

use super::styles;
use cardboardapp::commands::import::ImportOutcome;
use cardboardapp::commands::spaces::SpaceGroup;
use cardboardapp::commands::CascadeReport;
use cardboardapp::model::{Flashcard, StatusFilter, SuccessBand, Topic};
use cardboardapp::store::BatchReport;
use std::fmt::Write;

pub fn space_groups(groups: &[SpaceGroup]) -> String {
    if groups.is_empty() {
        return format!("{}\n", styles::muted().apply_to("No spaces yet."));
    }
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "{}", styles::group().apply_to(&group.name));
        for space in &group.spaces {
            let _ = writeln!(
                out,
                "  {}  {}",
                styles::title().apply_to(&space.name),
                styles::muted().apply_to(&space.id)
            );
        }
    }
    out
}

/// The success badge, or a dash for a topic that was never averaged.
pub fn average_badge(average: Option<f64>) -> String {
    match average {
        Some(avg) => styles::band(SuccessBand::from_average(avg))
            .apply_to(format!("{:.2}", avg))
            .to_string(),
        None => styles::muted().apply_to("-").to_string(),
    }
}

pub fn topic_list(topics: &[Topic]) -> String {
    if topics.is_empty() {
        return format!("{}\n", styles::muted().apply_to("No topics in this space."));
    }
    let mut out = String::new();
    for topic in topics {
        let _ = writeln!(
            out,
            "{}  {}  {}",
            average_badge(topic.success_average),
            styles::title().apply_to(&topic.title),
            styles::muted().apply_to(format!("{} @ ({}, {})", topic.id, topic.pos_x, topic.pos_y))
        );
    }
    out
}

pub fn topic_detail(topic: &Topic, cards: &[Flashcard]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  {}",
        styles::title().apply_to(&topic.title),
        average_badge(topic.success_average)
    );
    let _ = writeln!(out, "{}", styles::muted().apply_to(&topic.id));
    if !topic.content.is_empty() {
        let _ = writeln!(out, "\n{}", topic.content);
    }
    out.push('\n');
    out.push_str(&card_list(cards, None));
    out
}

/// Cards numbered by their 1-based position under `filter`, the positions
/// `card move` takes.
pub fn card_list(cards: &[Flashcard], filter: Option<StatusFilter>) -> String {
    let visible: Vec<&Flashcard> = cards
        .iter()
        .filter(|c| filter.map_or(true, |f| f.matches(c)))
        .collect();
    if visible.is_empty() {
        return format!("{}\n", styles::muted().apply_to("No cards."));
    }
    let mut out = String::new();
    for (i, card) in visible.iter().enumerate() {
        let _ = writeln!(
            out,
            "{} {}  {}  {}",
            styles::index().apply_to(format!("{:>3}.", i + 1)),
            card_question(card),
            styles::status(card.status).apply_to(format!("[{}]", card.status.selected_button())),
            styles::muted().apply_to(&card.id)
        );
    }
    out
}

pub fn card_question(card: &Flashcard) -> String {
    styles::card_text(card.is_bold, card.is_italic, &card.text_color)
        .apply_to(&card.question)
        .to_string()
}

pub fn card_answer(card: &Flashcard) -> String {
    styles::card_text(card.is_bold, card.is_italic, &card.text_color)
        .apply_to(&card.answer)
        .to_string()
}

pub fn cascade(report: &CascadeReport) -> String {
    format!(
        "{} {} space(s), {} topic(s), {} flashcard(s)\n",
        styles::success().apply_to("Deleted"),
        report.spaces,
        report.topics,
        report.flashcards
    )
}

/// One warning line per write that did not go through; empty when complete.
pub fn batch_warnings(report: &BatchReport) -> String {
    let mut out = String::new();
    for failure in &report.failed {
        let _ = writeln!(
            out,
            "{} {}: {}",
            styles::warning().apply_to("Not saved"),
            failure.id,
            failure.error
        );
    }
    out
}

pub fn import_summary(outcome: &ImportOutcome) -> String {
    let mut out = format!(
        "{} {} card(s)",
        styles::success().apply_to("Imported"),
        outcome.created.len()
    );
    if let Some(avg) = outcome.average {
        let _ = write!(out, ", average {}", average_badge(Some(avg)));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardboardapp::model::{CardStatus, Space};

    fn card(id: &str, question: &str, status: CardStatus) -> Flashcard {
        Flashcard {
            id: id.to_string(),
            topic_id: "t".to_string(),
            question: question.to_string(),
            question_html_content: None,
            answer: "a".to_string(),
            html_content: None,
            is_bold: false,
            is_italic: false,
            text_color: "#FFFFFF".to_string(),
            id_order: 0,
            status,
            status_missing: false,
        }
    }

    fn plain(s: String) -> String {
        console::strip_ansi_codes(&s).to_string()
    }

    #[test]
    fn card_list_numbers_visible_cards() {
        let cards = vec![
            card("a", "One", CardStatus::Mastered),
            card("b", "Two", CardStatus::Unset),
            card("c", "Three", CardStatus::Mastered),
        ];
        let out = plain(card_list(&cards, Some(StatusFilter(CardStatus::Mastered))));
        assert!(out.contains("1. One"));
        assert!(out.contains("2. Three"));
        assert!(!out.contains("Two"));

        let out = plain(card_list(&cards, None));
        assert!(out.contains("2. Two  [new]"));
    }

    #[test]
    fn groups_list_their_spaces() {
        let groups = vec![SpaceGroup {
            name: "Default".to_string(),
            spaces: vec![Space {
                id: "s1".to_string(),
                name: "Math".to_string(),
                group: String::new(),
                order: 0,
            }],
        }];
        let out = plain(space_groups(&groups));
        assert!(out.starts_with("Default\n"));
        assert!(out.contains("  Math  s1"));
    }

    #[test]
    fn badge_formats_two_decimals() {
        assert_eq!(plain(average_badge(Some(2.5))), "2.50");
        assert_eq!(plain(average_badge(None)), "-");
    }
}
