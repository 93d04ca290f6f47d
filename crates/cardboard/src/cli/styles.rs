//! Styles for the cardboard CLI.
//!
//! Renderers ask for styles by meaning (`title`, `muted`, a success band)
//! rather than by colour, so the palette can change in one place. `console`
//! drops the escape codes by itself when stdout is not a terminal.

use cardboardapp::model::{CardStatus, SuccessBand};
use console::Style;

pub fn title() -> Style {
    Style::new().bold()
}

pub fn muted() -> Style {
    Style::new().color256(rgb_to_ansi256((140, 140, 140)))
}

pub fn index() -> Style {
    Style::new().color256(rgb_to_ansi256((196, 140, 0)))
}

pub fn group() -> Style {
    Style::new().cyan().bold()
}

pub fn success() -> Style {
    Style::new().green()
}

pub fn warning() -> Style {
    Style::new().yellow().bold()
}

/// Badge colour for a topic's average, matching the status it rounds to.
pub fn band(band: SuccessBand) -> Style {
    match band {
        SuccessBand::New => Style::new().white(),
        SuccessBand::Learning => Style::new().yellow(),
        SuccessBand::Reviewing => Style::new().blue(),
        SuccessBand::Mastered => Style::new().green(),
    }
}

pub fn status(status: CardStatus) -> Style {
    match status.selected_button() {
        CardStatus::Learning => band(SuccessBand::Learning),
        CardStatus::Reviewing => band(SuccessBand::Reviewing),
        CardStatus::Mastered => band(SuccessBand::Mastered),
        _ => muted(),
    }
}

/// The style a card's own formatting asks for.
pub fn card_text(bold: bool, italic: bool, color: &str) -> Style {
    let mut style = Style::new();
    if bold {
        style = style.bold();
    }
    if italic {
        style = style.italic();
    }
    match parse_hex(color) {
        // White is the stored default; leave the terminal's own foreground.
        Some((255, 255, 255)) | None => style,
        Some(rgb) => style.color256(rgb_to_ansi256(rgb)),
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|c| c.to_string().repeat(2));
            let r = channel(&digits.next()?)?;
            let g = channel(&digits.next()?)?;
            let b = channel(&digits.next()?)?;
            Some((r, g, b))
        }
        6 => Some((
            channel(hex.get(0..2)?)?,
            channel(hex.get(2..4)?)?,
            channel(hex.get(4..6)?)?,
        )),
        _ => None,
    }
}

/// Nearest xterm-256 colour: the grey ramp for greys, the 6x6x6 cube otherwise.
pub fn rgb_to_ansi256((r, g, b): (u8, u8, u8)) -> u8 {
    if r == g && g == b {
        if r < 8 {
            16
        } else if r > 248 {
            231
        } else {
            232 + ((r as u16 - 8) * 24 / 247) as u8
        }
    } else {
        let red = (r as u16 * 5 / 255) as u8;
        let green = (g as u16 * 5 / 255) as u8;
        let blue = (b as u16 * 5 / 255) as u8;
        16 + 36 * red + 6 * green + blue
    }
}
