#![warn(clippy::all, clippy::pedantic)]
//! Logical column to screen column mapping.
//!
//! A tab counts as one logical column and advances the visual column to
//! the next multiple of the tab width. `expand_tabs` uses the same rule,
//! so `visual_column(line, line.len())` is always the length of the
//! expanded line.

/// Takes a line, a logical column and the tab width.
/// Returns the on-screen column of `x`.
#[must_use]
pub fn visual_column(line: &[u8], x: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    line.iter().take(x).fold(0, |col, &byte| {
        if byte == b'\t' {
            col + tab_width - (col % tab_width)
        } else {
            col + 1
        }
    })
}

/// Takes a line and the tab width.
/// Returns the display form of the line with every tab replaced by
/// spaces up to the next tab stop.
#[must_use]
pub fn expand_tabs(line: &[u8], tab_width: usize) -> Vec<u8> {
    let tab_width = tab_width.max(1);
    let mut expanded = Vec::with_capacity(line.len());
    for &byte in line {
        if byte == b'\t' {
            let spaces = tab_width - (expanded.len() % tab_width);
            expanded.resize(expanded.len() + spaces, b' ');
        } else {
            expanded.push(byte);
        }
    }
    expanded
}

/// Takes the number of lines in the buffer.
/// Returns the width of the line-number gutter, trailing space included.
#[must_use]
pub fn gutter_width(line_count: usize) -> usize {
    line_count.max(1).to_string().len() + 1
}
