#![warn(clippy::all, clippy::pedantic)]
use crate::{
    editor::BACKSPACE,
    error::FileError,
    layout::{expand_tabs, visual_column},
};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
};

/// Cursor position. `y` indexes the line, `x` is a logical column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// The lines being edited, plus the cursor that edits act on.
///
/// Lines are raw bytes: no decoding happens on load and none on save.
#[derive(Debug)]
pub struct FileBuffer {
    lines: Vec<Vec<u8>>,
    pub file_path: Option<String>,
    pub cursor: Position,
}

impl Default for FileBuffer {
    /// Takes nothing.
    /// Builds a `FileBuffer` holding a single empty line.
    fn default() -> Self {
        Self {
            lines: vec![Vec::new()],
            file_path: None,
            cursor: Position::default(),
        }
    }
}

impl FileBuffer {
    /// Takes a string slice representing a file path.
    /// Builds a `FileBuffer` from the contents of the file.
    ///
    /// # Errors
    ///
    /// Will return an error if the file cannot be opened or read.
    pub fn open(file_path: &str) -> Result<Self, FileError> {
        let file = File::open(file_path).map_err(|e| FileError::open(file_path, e))?;
        let mut contents = Vec::new();
        BufReader::new(file)
            .read_to_end(&mut contents)
            .map_err(|e| FileError::open(file_path, e))?;
        let buffer = Self {
            lines: split_lines(&contents),
            file_path: Some(file_path.to_string()),
            cursor: Position::default(),
        };
        log::info!("loaded {} ({} lines)", file_path, buffer.len());
        Ok(buffer)
    }

    /// Takes any sequence of lines.
    /// Builds an unnamed `FileBuffer` holding them.
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        let mut buffer = Self {
            lines: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        };
        buffer.ensure_row(0);
        buffer
    }

    /// Takes itself and a path.
    /// Writes every line, newline-terminated, to the path.
    ///
    /// # Errors
    ///
    /// Will return an error if the file cannot be created or written.
    pub fn save(&self, file_path: &str) -> Result<(), FileError> {
        let mut writer = BufWriter::new(File::create(file_path).map_err(FileError::Save)?);
        for line in &self.lines {
            writer.write_all(line).map_err(FileError::Save)?;
            writer.write_all(b"\n").map_err(FileError::Save)?;
        }
        writer.flush().map_err(FileError::Save)?;
        log::info!("wrote {} ({} lines)", file_path, self.len());
        Ok(())
    }

    /// Takes itself and a usize representing the index of a row.
    /// Returns the row's bytes if it exists.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[u8]> {
        self.lines.get(index).map(Vec::as_slice)
    }

    #[must_use]
    pub fn lines(&self) -> &[Vec<u8>] {
        &self.lines
    }

    /// Takes itself.
    /// Returns the number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn line_len(&self, index: usize) -> usize {
        self.lines.get(index).map_or(0, Vec::len)
    }

    /// Takes itself and a row index.
    /// Appends empty lines until the row exists.
    pub fn ensure_row(&mut self, index: usize) {
        if self.lines.len() <= index {
            self.lines.resize_with(index + 1, Vec::new);
        }
    }

    /// Takes itself and a minimum length.
    /// Pads the cursor row with spaces up to that length.
    pub fn pad_row(&mut self, min_len: usize) {
        let y = self.cursor.y;
        self.ensure_row(y);
        let line = &mut self.lines[y];
        if line.len() < min_len {
            line.resize(min_len, b' ');
        }
    }

    /// Takes itself and a byte.
    /// Inserts the byte at the cursor and moves the cursor past it.
    pub fn insert_char(&mut self, c: u8) {
        let Position { x, y } = self.cursor;
        self.ensure_row(y);
        let line = &mut self.lines[y];
        let at = x.min(line.len());
        line.insert(at, c);
        self.cursor.x = at + 1;
    }

    /// Takes itself and the tab width.
    /// Inserts a tab at the cursor, expands the row's tabs into spaces
    /// and moves the cursor to the end of the inserted run.
    pub fn insert_tab(&mut self, tab_width: usize) {
        let Position { x, y } = self.cursor;
        self.ensure_row(y);
        let line = &mut self.lines[y];
        let at = x.min(line.len());
        line.insert(at, b'\t');
        self.cursor.x = visual_column(line, at + 1, tab_width);
        *line = expand_tabs(line, tab_width);
    }

    /// Takes itself.
    /// Deletes the character under the cursor. An empty row is removed
    /// instead, moving the cursor to the end of the row above.
    pub fn delete_char(&mut self) {
        let Position { x, y } = self.cursor;
        let Some(line) = self.lines.get_mut(y) else {
            return;
        };
        if line.is_empty() {
            self.lines.remove(y);
            if self.lines.is_empty() {
                self.lines.push(Vec::new());
            }
            if y > 0 {
                self.cursor.y = y - 1;
                self.cursor.x = self.lines[y - 1].len().saturating_sub(1);
            } else {
                self.cursor.x = 0;
            }
        } else if x >= line.len() {
            line.pop();
            self.cursor.x = x.saturating_sub(1).min(line.len());
        } else {
            line.remove(x);
        }
    }

    /// Takes itself.
    /// Splits the cursor row at the cursor; the remainder becomes
    /// the next row and the cursor moves to its start.
    pub fn split_line(&mut self) {
        let Position { x, y } = self.cursor;
        self.ensure_row(y);
        let line = &mut self.lines[y];
        let rest = line.split_off(x.min(line.len()));
        self.lines.insert(y + 1, rest);
        self.cursor = Position::new(0, y + 1);
    }

    /// Takes itself.
    /// Removes the cursor row and moves to the start of the row above.
    pub fn delete_row(&mut self) {
        let y = self.cursor.y;
        if y >= self.lines.len() {
            return;
        }
        self.lines.remove(y);
        if self.lines.is_empty() {
            self.lines.push(Vec::new());
        }
        self.cursor = Position::new(0, y.saturating_sub(1));
    }

    /// Takes itself.
    /// Truncates the cursor row at the cursor.
    pub fn delete_to_end_of_line(&mut self) {
        let Position { x, y } = self.cursor;
        if let Some(line) = self.lines.get_mut(y) {
            line.truncate(x);
        }
    }

    /// Takes itself.
    /// Moves the cursor just past the end of its row.
    pub fn append_at_end(&mut self) {
        if let Some(line) = self.lines.get(self.cursor.y) {
            self.cursor.x = line.len();
        }
    }

    /// Takes itself.
    /// Moves the cursor forward to the next character that is not
    /// alphanumeric, or to the last column if there is none.
    pub fn jump_word(&mut self) {
        let Position { x, y } = self.cursor;
        let Some(line) = self.row(y) else {
            return;
        };
        if x + 1 >= line.len() {
            return;
        }
        self.cursor.x = (x + 1..line.len())
            .find(|&i| !line[i].is_ascii_alphanumeric())
            .unwrap_or(line.len() - 1);
    }

    /// Takes itself and the key entered.
    /// Moves the cursor if possible; `h`/`j`/`k`/`l` and backspace are
    /// understood, anything else is ignored.
    pub fn move_cursor(&mut self, direction: u8) {
        let Position { x, y } = self.cursor;
        match direction {
            b'h' | BACKSPACE => self.cursor.x = x.saturating_sub(1),
            b'l' => {
                if x + 1 < self.line_len(y) {
                    self.cursor.x = x + 1;
                }
            }
            b'j' => {
                if y + 1 < self.lines.len() {
                    self.cursor.y = y + 1;
                    self.clamp_x_to_row();
                }
            }
            b'k' => {
                if y > 0 {
                    self.cursor.y = y - 1;
                    self.clamp_x_to_row();
                }
            }
            _ => (),
        }
    }

    /// Takes itself.
    /// Brings the cursor back onto an existing row and column.
    pub fn clamp_cursor(&mut self) {
        self.ensure_row(0);
        self.cursor.y = self.cursor.y.min(self.lines.len() - 1);
        self.clamp_x_to_row();
    }

    fn clamp_x_to_row(&mut self) {
        let len = self.line_len(self.cursor.y);
        if self.cursor.x >= len {
            self.cursor.x = len.saturating_sub(1);
        }
    }
}

/// Splits file contents on `\n`. A trailing newline does not start an
/// extra line, and empty contents still give one line.
fn split_lines(contents: &[u8]) -> Vec<Vec<u8>> {
    let mut lines: Vec<Vec<u8>> = contents
        .split(|&b| b == b'\n')
        .map(<[u8]>::to_vec)
        .collect();
    if contents.ends_with(b"\n") {
        lines.pop();
    }
    if lines.is_empty() {
        lines.push(Vec::new());
    }
    lines
}
