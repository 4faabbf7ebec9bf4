//! Frame painting: styled document lines plus the two status rows.
//!
//! Writes into any `io::Write` via queued crossterm commands, so tests
//! can paint into a buffer and the main loop into stdout. One call
//! paints a whole frame and flushes.

use std::io::Write;

use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::{cursor, queue, terminal};

use pollux_gemtext::{Document, LineKind, STATUS_ROWS, Viewport};

/// Foreground color and bold flag for a line class.
fn line_style(kind: LineKind) -> (Option<Color>, bool) {
    match kind {
        LineKind::Heading(1) => (Some(Color::Red), true),
        LineKind::Heading(2) => (Some(Color::Green), true),
        LineKind::Heading(_) => (Some(Color::Cyan), true),
        LineKind::Quote => (Some(Color::DarkGreen), false),
        LineKind::Preformatted => (Some(Color::Yellow), false),
        LineKind::Link => (Some(Color::Blue), false),
        LineKind::List | LineKind::Normal => (None, false),
    }
}

/// Paint one frame: the visible document lines, the address bar, and
/// the bottom line (command buffer, then pending note, then a hint).
pub fn draw(
    out: &mut impl Write,
    doc: &Document,
    viewport: Viewport,
    address: &str,
    note: Option<&str>,
    command: Option<&str>,
) -> std::io::Result<()> {
    queue!(out, terminal::Clear(terminal::ClearType::All))?;

    for (row, line) in doc.lines.iter().enumerate() {
        queue!(out, cursor::MoveTo(0, row as u16))?;
        let (color, bold) = line_style(line.kind);
        if let Some(color) = color {
            queue!(out, SetForegroundColor(color))?;
        }
        if bold {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        queue!(out, Print(&line.text), ResetColor)?;
        if bold {
            queue!(out, SetAttribute(Attribute::Reset))?;
        }
    }

    if viewport.rows >= STATUS_ROWS {
        draw_status(out, doc, viewport, address, note, command)?;
    }

    out.flush()
}

fn draw_status(
    out: &mut impl Write,
    doc: &Document,
    viewport: Viewport,
    address: &str,
    note: Option<&str>,
    command: Option<&str>,
) -> std::io::Result<()> {
    let cols = viewport.cols as usize;

    // Address bar in reverse video, padded across the full width.
    let bar = clip(address, cols);
    queue!(
        out,
        cursor::MoveTo(0, viewport.rows - 2),
        SetAttribute(Attribute::Reverse),
        Print(format!("{bar:<cols$}")),
        SetAttribute(Attribute::Reset),
    )?;

    // A pending note owns the bottom row; the front end clears it when
    // the user starts typing so the buffer becomes visible.
    let bottom = if let Some(note) = note {
        note.to_string()
    } else if let Some(buffer) = command {
        format!(":{buffer}")
    } else if doc.links.is_empty() {
        String::new()
    } else {
        format!("{} links, :open N to follow", doc.links.len())
    };
    queue!(
        out,
        cursor::MoveTo(0, viewport.rows - 1),
        Print(clip(&bottom, cols)),
    )?;
    Ok(())
}

/// Truncate to the column budget on a character boundary.
fn clip(text: &str, cols: usize) -> String {
    text.chars().take(cols).collect()
}
