#![warn(clippy::all, clippy::pedantic)]
use crate::Position;
use crossterm::{
    cursor::{Hide, MoveTo, SetCursorStyle, Show},
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    #[default]
    Block,
    Bar,
}

/// Everything needed to paint one screen.
///
/// Text rows are already tab-expanded, prefixed with the gutter and cut
/// to the screen width. The status line sits on the row after them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,
    pub rows: Vec<Vec<u8>>,
    pub status_line: String,
    pub status_message: Option<String>,
    /// Screen cell for the hardware cursor, `x` column and `y` row.
    pub cursor: Position,
    pub cursor_shape: CursorShape,
}

/// Takes a `Frame` and a sink.
/// Writes the escape sequences that paint the frame, then flushes.
///
/// # Errors
///
/// Will return an error if the sink cannot be written or flushed.
#[allow(clippy::cast_possible_truncation)]
pub fn draw<W: Write>(frame: &Frame, out: &mut W) -> io::Result<()> {
    queue!(out, Hide)?;
    for (row_idx, row) in frame.rows.iter().enumerate() {
        queue!(out, MoveTo(0, row_idx as u16), Clear(ClearType::CurrentLine))?;
        out.write_all(row)?;
    }

    let status_row = frame.rows.len() as u16;
    queue!(
        out,
        MoveTo(0, status_row),
        Clear(ClearType::CurrentLine),
        Print(&frame.status_line)
    )?;
    if let Some(message) = &frame.status_message {
        let col = frame.width.saturating_sub(message.len());
        queue!(out, MoveTo(col as u16, status_row), Print(message))?;
    }

    let style = match frame.cursor_shape {
        CursorShape::Block => SetCursorStyle::BlinkingBlock,
        CursorShape::Bar => SetCursorStyle::BlinkingBar,
    };
    queue!(
        out,
        style,
        MoveTo(frame.cursor.x as u16, frame.cursor.y as u16),
        Show
    )?;
    out.flush()
}
