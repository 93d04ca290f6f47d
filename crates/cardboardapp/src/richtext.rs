//! # Rich Text
//!
//! Card text is an ordered list of [`Run`]s, each a piece of text with one
//! [`Style`]. Formatting is applied to character ranges by explicit calls; no
//! editor selection or focus state is involved.
//!
//! Runs are kept canonical after every edit: no empty runs, and no two
//! neighbours with the same style. Two documents with the same text and the
//! same per-character styling therefore compare equal.
//!
//! Ranges are in characters (Unicode scalar values), not bytes, and are
//! clamped to the text length.

use crate::error::{CardboardError, Result};
use crate::model::is_hex_color;
use std::ops::Range;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
    /// `#RGB` or `#RRGGBB`.
    pub color: Option<String>,
}

impl Style {
    pub fn is_plain(&self) -> bool {
        *self == Style::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub style: Style,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText {
    runs: Vec<Run>,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn byte_index(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(b, _)| b)
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_plain(text: &str) -> Self {
        let mut rich = Self::new();
        rich.push(text, Style::default());
        rich
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.runs.iter().map(|r| char_len(&r.text)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn push(&mut self, text: &str, style: Style) {
        let end = self.len();
        self.insert(end, text, style);
    }

    pub fn insert(&mut self, at: usize, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        let at = at.min(self.len());
        let index = self.split_at(at);
        self.runs.insert(
            index,
            Run {
                text: text.to_string(),
                style,
            },
        );
        self.normalize();
    }

    pub fn delete(&mut self, range: Range<usize>) {
        let Some((start, end)) = self.clamp(range) else {
            return;
        };
        let first = self.split_at(start);
        let last = self.split_at(end);
        self.runs.drain(first..last);
        self.normalize();
    }

    /// Makes the range bold, or plain if it is already bold throughout.
    pub fn toggle_bold(&mut self, range: Range<usize>) {
        let all_bold = self.all_in(range.clone(), |s| s.bold);
        self.restyle(range, |s| s.bold = !all_bold);
    }

    /// Makes the range italic, or upright if it is already italic throughout.
    pub fn toggle_italic(&mut self, range: Range<usize>) {
        let all_italic = self.all_in(range.clone(), |s| s.italic);
        self.restyle(range, |s| s.italic = !all_italic);
    }

    /// Colours the range; `None` removes any colour.
    pub fn set_color(&mut self, range: Range<usize>, color: Option<&str>) -> Result<()> {
        if let Some(c) = color {
            if !is_hex_color(c) {
                return Err(CardboardError::Validation(format!(
                    "'{}' is not a #RGB or #RRGGBB colour",
                    c
                )));
            }
        }
        let color = color.map(str::to_string);
        self.restyle(range, |s| s.color = color.clone());
        Ok(())
    }

    /// Renders HTML with `<b>`, `<i>` and coloured `<span>` wrappers.
    ///
    /// Text is escaped and line breaks become `<br>`. Unstyled text is emitted
    /// bare, so plain input renders to its escaped self.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for run in &self.runs {
            let mut body = escape_html(&run.text);
            if run.style.italic {
                body = format!("<i>{}</i>", body);
            }
            if run.style.bold {
                body = format!("<b>{}</b>", body);
            }
            if let Some(color) = &run.style.color {
                body = format!("<span style=\"color: {}\">{}</span>", color, body);
            }
            html.push_str(&body);
        }
        html
    }

    fn clamp(&self, range: Range<usize>) -> Option<(usize, usize)> {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.min(len);
        (start < end).then_some((start, end))
    }

    /// Ensures a run boundary at char position `pos`, returning the index of
    /// the run starting there.
    fn split_at(&mut self, pos: usize) -> usize {
        let mut offset = 0;
        for i in 0..self.runs.len() {
            if pos == offset {
                return i;
            }
            let len = char_len(&self.runs[i].text);
            if pos < offset + len {
                let byte = byte_index(&self.runs[i].text, pos - offset);
                let tail = self.runs[i].text.split_off(byte);
                let style = self.runs[i].style.clone();
                self.runs.insert(i + 1, Run { text: tail, style });
                return i + 1;
            }
            offset += len;
        }
        self.runs.len()
    }

    fn all_in(&self, range: Range<usize>, check: impl Fn(&Style) -> bool) -> bool {
        let Some((start, end)) = self.clamp(range) else {
            return false;
        };
        let mut offset = 0;
        for run in &self.runs {
            let len = char_len(&run.text);
            let overlaps = offset < end && start < offset + len;
            if overlaps && !check(&run.style) {
                return false;
            }
            offset += len;
        }
        true
    }

    fn restyle(&mut self, range: Range<usize>, apply: impl Fn(&mut Style)) {
        let Some((start, end)) = self.clamp(range) else {
            return;
        };
        let first = self.split_at(start);
        let last = self.split_at(end);
        for run in &mut self.runs[first..last] {
            apply(&mut run.style);
        }
        self.normalize();
    }

    fn normalize(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(prev) if prev.style == run.style => prev.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br>"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> Style {
        Style {
            bold: true,
            ..Style::default()
        }
    }

    #[test]
    fn plain_text_roundtrip() {
        let rich = RichText::from_plain("hello world");
        assert_eq!(rich.runs().len(), 1);
        assert_eq!(rich.plain_text(), "hello world");
        assert_eq!(rich.len(), 11);
        assert!(RichText::from_plain("").is_empty());
    }

    #[test]
    fn toggle_splits_runs_at_range_edges() {
        let mut rich = RichText::from_plain("hello world");
        rich.toggle_bold(6..11);
        assert_eq!(
            rich.runs(),
            &[
                Run {
                    text: "hello ".into(),
                    style: Style::default()
                },
                Run {
                    text: "world".into(),
                    style: bold()
                },
            ]
        );
    }

    #[test]
    fn toggle_on_fully_bold_range_clears_it() {
        let mut rich = RichText::from_plain("abcdef");
        rich.toggle_bold(0..6);
        rich.toggle_bold(2..4);
        let styles: Vec<bool> = rich.runs().iter().map(|r| r.style.bold).collect();
        assert_eq!(styles, vec![true, false, true]);

        // Mixed range becomes fully bold, then neighbours merge.
        rich.toggle_bold(1..5);
        assert_eq!(rich.runs().len(), 1);
        assert!(rich.runs()[0].style.bold);
    }

    #[test]
    fn styles_combine_and_render_nested() {
        let mut rich = RichText::from_plain("abc");
        rich.toggle_italic(0..3);
        rich.toggle_bold(1..2);
        rich.set_color(1..2, Some("#F00")).unwrap();
        assert_eq!(
            rich.to_html(),
            "<i>a</i><span style=\"color: #F00\"><b><i>b</i></b></span><i>c</i>"
        );
    }

    #[test]
    fn invalid_color_rejected() {
        let mut rich = RichText::from_plain("abc");
        assert!(rich.set_color(0..1, Some("red")).is_err());
        rich.set_color(0..3, Some("#123456")).unwrap();
        rich.set_color(0..3, None).unwrap();
        assert!(rich.runs()[0].style.is_plain());
    }

    #[test]
    fn html_is_escaped() {
        let rich = RichText::from_plain("a < b & \"c\"\nnext");
        assert_eq!(rich.to_html(), "a &lt; b &amp; &quot;c&quot;<br>next");
    }

    #[test]
    fn ranges_count_characters_not_bytes() {
        let mut rich = RichText::from_plain("héllo wörld");
        rich.toggle_bold(1..2);
        assert_eq!(rich.runs()[1].text, "é");
        rich.delete(6..11);
        assert_eq!(rich.plain_text(), "héllo ");
    }

    #[test]
    fn insert_inherits_nothing_and_merges() {
        let mut rich = RichText::new();
        rich.push("world", bold());
        rich.insert(0, "hello ", Style::default());
        rich.insert(100, "!", bold());
        assert_eq!(rich.runs().len(), 2);
        assert_eq!(rich.runs()[1].text, "world!");
        assert_eq!(rich.to_html(), "hello <b>world!</b>");
    }

    #[test]
    fn out_of_range_edits_are_clamped() {
        let mut rich = RichText::from_plain("abc");
        rich.toggle_bold(2..50);
        assert_eq!(rich.runs()[1].text, "c");
        rich.toggle_italic(10..20);
        rich.delete(5..9);
        assert_eq!(rich.plain_text(), "abc");
    }
}
