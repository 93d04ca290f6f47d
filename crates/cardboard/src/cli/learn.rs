//! The interactive `learn` loop.
//!
//! Shows one question at a time. Enter reveals the answer; after that a digit
//! 1-4 rates the card and moves on, Enter skips to the next card, and `q`
//! (or end of input) stops. The session decides which card comes next.

use super::render;
use super::styles;
use anyhow::Result;
use cardboardapp::model::{CardStatus, StatusFilter};
use cardboardapp::session::TopicSession;
use cardboardapp::store::DataStore;
use cardboardapp::CardboardApi;
use std::io::{BufRead, Write};

enum Input {
    Continue,
    Rate(CardStatus),
    Quit,
}

fn read_input<R: BufRead>(input: &mut R) -> Result<Input> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Input::Quit);
    }
    let line = line.trim();
    Ok(match line {
        "" => Input::Continue,
        "q" | "quit" => Input::Quit,
        other => match other.parse::<CardStatus>() {
            Ok(status) if status != CardStatus::Unset => Input::Rate(status),
            _ => Input::Continue,
        },
    })
}

/// Runs the loop until the user quits and returns the session as it ended.
pub fn run<S, R, W>(
    api: &mut CardboardApi<S>,
    topic_id: &str,
    filter: Option<StatusFilter>,
    input: &mut R,
    out: &mut W,
) -> Result<TopicSession>
where
    S: DataStore,
    R: BufRead,
    W: Write,
{
    let mut session = api.open_session(topic_id)?;
    session.set_filter(filter);

    writeln!(
        out,
        "{}  {}",
        styles::title().apply_to(&session.topic().title),
        render::average_badge(session.topic().success_average)
    )?;
    if session.start_learning().is_none() {
        writeln!(out, "{}", styles::muted().apply_to("No cards to learn."))?;
        session.close();
        return Ok(session);
    }

    while let Some(card) = session.current_card().cloned() {
        writeln!(out, "\n{} {}", styles::index().apply_to("Q:"), render::card_question(&card))?;
        writeln!(out, "{}", styles::muted().apply_to("[enter] show answer  [q] quit"))?;
        out.flush()?;
        if let Input::Quit = read_input(input)? {
            break;
        }

        session.reveal_answer();
        writeln!(out, "{} {}", styles::index().apply_to("A:"), render::card_answer(&card))?;
        writeln!(
            out,
            "{}",
            styles::muted().apply_to(
                "[1] new  [2] learning  [3] reviewing  [4] mastered  [enter] next  [q] quit"
            )
        )?;
        out.flush()?;
        match read_input(input)? {
            Input::Quit => break,
            Input::Continue => {
                session.next_card();
            }
            Input::Rate(status) => {
                let change = api.set_card_status(topic_id, &card.id, status)?;
                writeln!(
                    out,
                    "{} {}  average {}",
                    styles::success().apply_to("Rated"),
                    styles::status(status).apply_to(status),
                    render::average_badge(Some(change.average))
                )?;
                session.apply_status(change);
                // A rating that hides the card under the filter already moved on.
                if session.current_card().map(|c| c.id.as_str()) == Some(card.id.as_str()) {
                    session.next_card();
                }
            }
        }
    }

    session.stop_learning();
    session.close();
    Ok(session)
}
