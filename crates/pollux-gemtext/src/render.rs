//! Viewport rendering: hard wrap, scroll window, row budget.
//!
//! [`render`] is pure: the same body, viewport, and scroll offset always
//! produce the same [`Document`]. The terminal size is read fresh by the
//! caller each frame and passed in, so resizes take effect on the next
//! render cycle.

use crate::parser::{LineKind, LinkTable, parse};

/// Rows reserved at the bottom of the screen for the status/command bar.
pub const STATUS_ROWS: u16 = 2;

/// Terminal geometry for one render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub rows: u16,
    pub cols: u16,
}

/// One visible output line with its style class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub kind: LineKind,
    pub text: String,
}

/// The rendered view of one response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Lines at or after the scroll offset, at most `rows - STATUS_ROWS`.
    pub lines: Vec<StyledLine>,
    /// Link table for the whole body, independent of the scroll window.
    pub links: LinkTable,
    /// True when the body was exhausted before the row budget; clamps
    /// further downward scrolling.
    pub reached_end: bool,
}

/// Render a body for one frame.
pub fn render(body: &str, markup: bool, viewport: Viewport, scroll: usize) -> Document {
    let parsed = parse(body, markup);
    let cols = viewport.cols.max(1) as usize;
    let budget = viewport.rows.saturating_sub(STATUS_ROWS) as usize;

    let mut wrapped: Vec<StyledLine> = Vec::new();
    for line in &parsed.lines {
        for piece in wrap_line(&line.text, cols) {
            wrapped.push(StyledLine {
                kind: line.kind,
                text: piece,
            });
        }
    }

    let total = wrapped.len();
    let visible: Vec<StyledLine> = wrapped
        .into_iter()
        .skip(scroll)
        .take(budget)
        .collect();
    let reached_end = total <= scroll + budget;

    Document {
        lines: visible,
        links: parsed.links,
        reached_end,
    }
}

/// Hard-wrap one logical line at the column count.
///
/// No word-boundary search; a single leading space immediately after a
/// wrap is elided so continuations do not appear indented.
fn wrap_line(text: &str, cols: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= cols {
        return vec![text.to_string()];
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        if !pieces.is_empty() && chars[start] == ' ' {
            start += 1;
            if start >= chars.len() {
                break;
            }
        }
        let end = (start + cols).min(chars.len());
        pieces.push(chars[start..end].iter().collect());
        start = end;
    }
    pieces
}
