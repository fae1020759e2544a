#![warn(clippy::all, clippy::pedantic)]
use crate::{
    command::{self, parse_command, Command},
    config::Settings,
    error::FileError,
    layout::{expand_tabs, gutter_width, visual_column},
    renderer::{CursorShape, Frame},
    FileBuffer, Position, Size,
};
use std::{
    collections::VecDeque,
    fmt,
    time::{Duration, Instant},
};

pub const ESC: u8 = 0x1b;
pub const BACKSPACE: u8 = 0x7f;

/// Where the editor pulls follow-up bytes of an escape sequence from.
/// `None` means nothing is waiting; it never blocks.
pub trait ByteSource {
    fn read_byte(&mut self) -> Option<u8>;
}

impl ByteSource for VecDeque<u8> {
    fn read_byte(&mut self) -> Option<u8> {
        self.pop_front()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    View,
    Edit,
    Command,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mode::View => write!(f, "VIEW"),
            Mode::Edit => write!(f, "EDIT"),
            Mode::Command => write!(f, "COMMAND"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub set_at: Instant,
}

/// The modal editing engine.
///
/// Owns the buffer, the cursor (through the buffer), the mode and the
/// command line. Bytes go in through `process_byte`, screens come out
/// through `frame`.
pub struct Editor {
    settings: Settings,
    buffer: FileBuffer,
    mode: Mode,
    command_buffer: String,
    pending_delete: bool,
    status: Option<StatusMessage>,
    size: Size,
    offset_y: usize,
    should_quit: bool,
    needs_redraw: bool,
}

impl Editor {
    /// Takes the resolved settings, the initial buffer and the screen size.
    /// Builds an `Editor` in View mode.
    #[must_use]
    pub fn new(settings: Settings, buffer: FileBuffer, size: Size) -> Self {
        let mut editor = Self {
            settings,
            buffer,
            mode: Mode::default(),
            command_buffer: String::new(),
            pending_delete: false,
            status: None,
            size,
            offset_y: 0,
            should_quit: false,
            needs_redraw: true,
        };
        editor.buffer.clamp_cursor();
        editor.scroll();
        editor
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn buffer(&self) -> &FileBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn cursor(&self) -> Position {
        self.buffer.cursor
    }

    #[must_use]
    pub fn command_buffer(&self) -> &str {
        &self.command_buffer
    }

    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Takes itself and a message.
    /// Replaces the status message.
    pub fn set_status_message(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            set_at: Instant::now(),
        });
        self.needs_redraw = true;
    }

    /// Takes itself and the longest a message may stay.
    /// Drops the status message if it is older than that. Returns
    /// whether one was dropped.
    pub fn expire_status(&mut self, max_age: Duration) -> bool {
        let expired = self
            .status
            .as_ref()
            .is_some_and(|status| status.set_at.elapsed() >= max_age);
        if expired {
            self.status = None;
            self.needs_redraw = true;
        }
        expired
    }

    pub fn mark_needs_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Takes itself.
    /// Returns whether a redraw is due and resets the flag.
    pub fn take_needs_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// Takes itself and the new terminal size.
    /// Keeps the cursor row on screen and schedules a redraw.
    pub fn update_window_size(&mut self, size: Size) {
        self.size = size;
        self.scroll();
        self.needs_redraw = true;
    }

    /// Takes itself and a file path.
    /// Replaces the buffer with the file's contents. Failures leave an
    /// empty buffer and are reported on the status line.
    pub fn load_file(&mut self, path: &str) {
        match FileBuffer::open(path) {
            Ok(buffer) => {
                self.buffer = buffer;
                self.set_status_message(format!("\"{path}\""));
            }
            Err(FileError::NotFound(_)) => {
                log::info!("{path} does not exist yet, starting empty");
                self.buffer = FileBuffer::default();
                self.buffer.file_path = Some(path.to_string());
                self.set_status_message(format!("\"{path}\" [new file]"));
            }
            Err(err) => {
                log::warn!("{err}");
                self.buffer = FileBuffer::default();
                self.buffer.file_path = Some(path.to_string());
                self.set_status_message(err.to_string());
            }
        }
        self.offset_y = 0;
    }

    /// Takes itself, one input byte and the source of any bytes that
    /// follow it.
    /// Interprets the byte in the current mode.
    pub fn process_byte(&mut self, c: u8, input: &mut impl ByteSource) {
        match self.mode {
            Mode::View => self.process_view(c, input),
            Mode::Edit => self.process_edit(c),
            Mode::Command => self.process_command(c),
        }
        self.scroll();
        self.needs_redraw = true;
    }

    fn process_view(&mut self, c: u8, input: &mut impl ByteSource) {
        if std::mem::take(&mut self.pending_delete) {
            match c {
                b'd' => self.buffer.delete_row(),
                ESC => Self::discard_escape_sequence(input),
                _ => (),
            }
            return;
        }
        match c {
            b'i' => self.enter_edit(),
            b'a' => {
                let len = self.buffer.line_len(self.buffer.cursor.y);
                self.buffer.cursor.x = (self.buffer.cursor.x + 1).min(len);
                self.enter_edit();
            }
            b'A' => {
                self.enter_edit();
                self.buffer.append_at_end();
            }
            b'o' => {
                self.buffer.append_at_end();
                self.buffer.split_line();
                self.enter_edit();
            }
            b'x' => self.buffer.delete_char(),
            b'd' => self.pending_delete = true,
            b'D' => self.buffer.delete_to_end_of_line(),
            b'w' => self.buffer.jump_word(),
            b'0' => self.buffer.cursor.x = 0,
            b':' => self.enter_command(),
            ESC => Self::discard_escape_sequence(input),
            other => self.buffer.move_cursor(other),
        }
    }

    /// Drops the two bytes following an ESC in View mode. Arrow keys
    /// arrive as ESC [ A..D and are not bound.
    fn discard_escape_sequence(input: &mut impl ByteSource) {
        let seq = [input.read_byte(), input.read_byte()];
        if !matches!(seq, [Some(b'['), Some(b'A'..=b'D')]) {
            log::trace!("ignoring escape sequence {seq:?}");
        }
    }

    fn process_edit(&mut self, c: u8) {
        match c {
            ESC => {
                self.buffer.cursor.x = self.buffer.cursor.x.saturating_sub(1);
                self.enter_view();
            }
            BACKSPACE => self.buffer.delete_char(),
            b'\n' => self.buffer.split_line(),
            b'\t' => self.buffer.insert_tab(self.settings.tab_width),
            other => self.buffer.insert_char(other),
        }
    }

    fn process_command(&mut self, c: u8) {
        match c {
            b'\n' => {
                if !self.command_buffer.is_empty() {
                    self.execute_command();
                }
                self.leave_command();
            }
            BACKSPACE => {
                self.command_buffer.pop();
                if self.command_buffer.is_empty() {
                    self.leave_command();
                } else {
                    self.buffer.cursor.x = self.buffer.cursor.x.saturating_sub(1);
                }
            }
            ESC => self.leave_command(),
            other => {
                self.command_buffer.push(char::from(other));
                self.buffer.cursor.x += 1;
            }
        }
    }

    fn enter_edit(&mut self) {
        log::debug!("{} -> {}", self.mode, Mode::Edit);
        self.mode = Mode::Edit;
    }

    fn enter_view(&mut self) {
        log::debug!("{} -> {}", self.mode, Mode::View);
        self.mode = Mode::View;
    }

    fn enter_command(&mut self) {
        log::debug!("{} -> {}", self.mode, Mode::Command);
        self.command_buffer.clear();
        self.mode = Mode::Command;
        // the command bar cursor is kept in x, which needs two columns
        self.buffer.pad_row(2);
        self.buffer.cursor.x = 1;
        self.command_buffer.push(':');
    }

    fn leave_command(&mut self) {
        self.command_buffer.clear();
        self.enter_view();
        self.buffer.clamp_cursor();
    }

    /// Takes itself.
    /// Runs the command in the command buffer, then clears it.
    fn execute_command(&mut self) {
        let command = parse_command(&self.command_buffer);
        log::debug!("executing {command:?}");
        match command {
            Command::Write => {
                self.write_current();
            }
            Command::Quit => self.should_quit = true,
            Command::WriteQuit => {
                if self.write_current() {
                    self.should_quit = true;
                }
            }
            Command::WriteAs(name) => {
                if name.is_empty() {
                    self.set_status_message(command::INVALID_FILENAME_MSG);
                } else if self.write_to(&name) {
                    self.buffer.file_path = Some(name);
                }
            }
            Command::Unknown(text) => log::debug!("no such command: {text}"),
        }
        self.command_buffer.clear();
    }

    /// Saves to the current file, or the default one. Returns whether
    /// the buffer was written.
    fn write_current(&mut self) -> bool {
        let target = self
            .buffer
            .file_path
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| self.settings.default_filename.clone());
        match target {
            Some(target) => self.write_to(&target),
            None => {
                self.set_status_message(command::INVALID_FILENAME_MSG);
                false
            }
        }
    }

    fn write_to(&mut self, target: &str) -> bool {
        match self.buffer.save(target) {
            Ok(()) => {
                self.set_status_message(format!("{}{target}", command::WROTE_TO));
                true
            }
            Err(err) => {
                log::warn!("{target}: {err}");
                self.set_status_message(err.to_string());
                false
            }
        }
    }

    /// Rows available for text; the last screen row is the status line.
    fn text_rows(&self) -> usize {
        usize::from(self.size.height).saturating_sub(1).max(1)
    }

    fn scroll(&mut self) {
        let rows = self.text_rows();
        let y = self.buffer.cursor.y;
        if y < self.offset_y {
            self.offset_y = y;
        } else if y >= self.offset_y + rows {
            self.offset_y = y + 1 - rows;
        }
    }

    /// Takes itself.
    /// Returns the screen contents for the current state.
    #[must_use]
    pub fn frame(&self) -> Frame {
        let width = usize::from(self.size.width);
        let tab_width = self.settings.tab_width;
        let line_count = self.buffer.len();
        let gutter = if self.settings.show_line_numbers {
            gutter_width(line_count)
        } else {
            0
        };

        let rows = (0..self.text_rows())
            .map(|screen_row| {
                let idx = self.offset_y + screen_row;
                let mut row = Vec::with_capacity(width);
                if gutter > 0 {
                    let label = if idx < line_count || idx == 0 {
                        format!("{:>w$} ", idx + 1, w = gutter - 1)
                    } else {
                        " ".repeat(gutter)
                    };
                    row.extend_from_slice(label.as_bytes());
                }
                match self.buffer.row(idx) {
                    Some(line) => row.extend(expand_tabs(line, tab_width)),
                    None if idx != 0 => row.push(b'~'),
                    None => (),
                }
                row.truncate(width);
                row
            })
            .collect();

        let last_col = width.saturating_sub(1);
        let Position { x, y } = self.buffer.cursor;
        let (status_line, cursor) = if self.mode == Mode::Command {
            (
                self.command_buffer.clone(),
                Position::new(x.min(last_col), self.text_rows()),
            )
        } else {
            let line = self.buffer.row(y).unwrap_or_default();
            let col = visual_column(line, x, tab_width) + gutter;
            (
                String::new(),
                Position::new(col.min(last_col), y.saturating_sub(self.offset_y)),
            )
        };

        Frame {
            width,
            rows,
            status_line,
            status_message: self.status_message().map(str::to_string),
            cursor,
            cursor_shape: if self.mode == Mode::Edit {
                CursorShape::Bar
            } else {
                CursorShape::Block
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SIZE: Size = Size {
        width: 80,
        height: 24,
    };

    fn new_editor_with(lines: &[&str], settings: Settings) -> Editor {
        Editor::new(
            settings,
            FileBuffer::from_lines(lines.iter().copied()),
            SIZE,
        )
    }

    fn new_editor(lines: &[&str]) -> Editor {
        new_editor_with(lines, Settings::default())
    }

    fn feed(editor: &mut Editor, keys: &[u8]) {
        let mut input: VecDeque<u8> = keys.iter().copied().collect();
        while let Some(byte) = input.pop_front() {
            editor.process_byte(byte, &mut input);
        }
    }

    fn text(editor: &Editor) -> Vec<String> {
        editor
            .buffer()
            .lines()
            .iter()
            .map(|l| String::from_utf8_lossy(l).into_owned())
            .collect()
    }

    fn path_in(dir: &tempfile::TempDir, name: &str) -> String {
        dir.path().join(name).to_str().unwrap().to_string()
    }

    #[test]
    fn starts_in_view_mode() {
        let editor = new_editor(&[""]);
        assert_eq!(editor.mode(), Mode::View);
        assert_eq!(editor.cursor(), Position::new(0, 0));
        assert_eq!(editor.buffer().len(), 1);
        assert!(!editor.should_quit());
    }

    #[test]
    fn insert_then_escape() {
        let mut editor = new_editor(&["abc"]);
        feed(&mut editor, b"iz");
        assert_eq!(text(&editor), vec!["zabc"]);
        assert_eq!(editor.cursor().x, 1);
        assert_eq!(editor.mode(), Mode::Edit);
        feed(&mut editor, &[ESC]);
        assert_eq!(editor.cursor().x, 0);
        assert_eq!(editor.mode(), Mode::View);
    }

    #[test]
    fn view_keys_are_typed_literally_in_edit_mode() {
        let mut editor = new_editor(&[""]);
        feed(&mut editor, b"iiaxdd:hjkl");
        assert_eq!(text(&editor), vec!["iaxdd:hjkl"]);
        assert_eq!(editor.mode(), Mode::Edit);
    }

    #[test]
    fn append_moves_right_once() {
        let mut editor = new_editor(&["abc"]);
        feed(&mut editor, b"aZ");
        assert_eq!(text(&editor), vec!["aZbc"]);
        let mut editor = new_editor(&[""]);
        feed(&mut editor, b"a");
        assert_eq!(editor.cursor().x, 0);
    }

    #[test]
    fn append_at_end_of_line() {
        let mut editor = new_editor(&["abc"]);
        feed(&mut editor, b"AZ");
        assert_eq!(text(&editor), vec!["abcZ"]);
        assert_eq!(editor.mode(), Mode::Edit);
    }

    #[test]
    fn open_line_below() {
        let mut editor = new_editor(&["first", "third"]);
        feed(&mut editor, b"osecond");
        assert_eq!(text(&editor), vec!["first", "second", "third"]);
        assert_eq!(editor.cursor(), Position::new(6, 1));
        assert_eq!(editor.mode(), Mode::Edit);
    }

    #[test]
    fn delete_char_in_view() {
        let mut editor = new_editor(&["hello"]);
        feed(&mut editor, b"x");
        assert_eq!(text(&editor), vec!["ello"]);
        assert_eq!(editor.mode(), Mode::View);
    }

    #[test]
    fn double_d_deletes_row() {
        let mut editor = new_editor(&["one", "two", "three"]);
        feed(&mut editor, b"jdd");
        assert_eq!(text(&editor), vec!["one", "three"]);
        assert_eq!(editor.cursor(), Position::new(0, 0));
    }

    #[test]
    fn dd_on_single_row_leaves_empty_row() {
        let mut editor = new_editor(&["only"]);
        feed(&mut editor, b"ldd");
        assert_eq!(text(&editor), vec![""]);
        assert_eq!(editor.cursor(), Position::new(0, 0));
    }

    #[test]
    fn key_after_lone_d_is_swallowed() {
        let mut editor = new_editor(&["one", "two"]);
        feed(&mut editor, b"dj");
        assert_eq!(editor.cursor(), Position::new(0, 0));
        assert_eq!(text(&editor), vec!["one", "two"]);
        // the prefix is gone, so one more d does not delete
        feed(&mut editor, b"d");
        assert_eq!(text(&editor), vec!["one", "two"]);
        feed(&mut editor, b"d");
        assert_eq!(text(&editor), vec!["two"]);
    }

    #[test]
    fn arrow_after_lone_d_is_swallowed_whole() {
        let mut editor = new_editor(&["abc", "def"]);
        feed(&mut editor, b"d\x1b[A");
        assert_eq!(editor.mode(), Mode::View);
        assert_eq!(editor.cursor(), Position::new(0, 0));
        assert_eq!(text(&editor), vec!["abc", "def"]);
        feed(&mut editor, b"j");
        assert_eq!(editor.cursor(), Position::new(0, 1));
    }

    #[test]
    fn delete_to_end_and_line_start() {
        let mut editor = new_editor(&["hello world"]);
        feed(&mut editor, b"lllllD");
        assert_eq!(text(&editor), vec!["hello"]);
        feed(&mut editor, b"0");
        assert_eq!(editor.cursor().x, 0);
    }

    #[test]
    fn word_jump() {
        let mut editor = new_editor(&["foo bar"]);
        feed(&mut editor, b"w");
        assert_eq!(editor.cursor().x, 3);
    }

    #[test]
    fn arrow_sequences_are_discarded() {
        let mut editor = new_editor(&["abc", "def"]);
        feed(&mut editor, b"\x1b[A\x1b[B\x1b[C\x1b[D");
        assert_eq!(editor.cursor(), Position::new(0, 0));
        assert_eq!(editor.mode(), Mode::View);
        assert_eq!(text(&editor), vec!["abc", "def"]);
    }

    #[test]
    fn lone_escape_in_view_does_not_wait() {
        let mut editor = new_editor(&["abc"]);
        let mut input = VecDeque::<u8>::new();
        editor.process_byte(ESC, &mut input);
        assert_eq!(editor.mode(), Mode::View);
        feed(&mut editor, b"l");
        assert_eq!(editor.cursor().x, 1);
    }

    #[test]
    fn hjkl_stay_inside_buffer() {
        let mut editor = new_editor(&["abc", "de", ""]);
        feed(&mut editor, b"kkkhhh");
        assert_eq!(editor.cursor(), Position::new(0, 0));
        feed(&mut editor, b"llllll");
        assert_eq!(editor.cursor(), Position::new(2, 0));
        feed(&mut editor, b"j");
        assert_eq!(editor.cursor(), Position::new(1, 1));
        feed(&mut editor, b"jjjj");
        assert_eq!(editor.cursor(), Position::new(0, 2));
    }

    #[test]
    fn edit_mode_backspace_and_newline() {
        let mut editor = new_editor(&[""]);
        feed(&mut editor, b"iab\x7f");
        assert_eq!(text(&editor), vec!["a"]);
        assert_eq!(editor.cursor().x, 1);
        feed(&mut editor, b"\nc");
        assert_eq!(text(&editor), vec!["a", "c"]);
        assert_eq!(editor.cursor(), Position::new(1, 1));
    }

    #[test]
    fn edit_mode_tab_expands() {
        let mut editor = new_editor_with(
            &["x"],
            Settings {
                tab_width: 4,
                ..Settings::default()
            },
        );
        feed(&mut editor, b"i\t");
        assert_eq!(text(&editor), vec!["    x"]);
        assert_eq!(editor.cursor().x, 4);
    }

    #[test]
    fn entering_command_mode() {
        let mut editor = new_editor(&[""]);
        feed(&mut editor, b":");
        assert_eq!(editor.mode(), Mode::Command);
        assert_eq!(editor.command_buffer(), ":");
        assert_eq!(editor.cursor().x, 1);
        assert_eq!(text(&editor), vec!["  "]);
        feed(&mut editor, b"wq");
        assert_eq!(editor.command_buffer(), ":wq");
        assert_eq!(editor.cursor().x, 3);
    }

    #[test]
    fn command_backspace_to_empty_returns_to_view() {
        let mut editor = new_editor(&["hello"]);
        feed(&mut editor, b":w\x7f");
        assert_eq!(editor.command_buffer(), ":");
        assert_eq!(editor.cursor().x, 1);
        feed(&mut editor, b"\x7f");
        assert_eq!(editor.mode(), Mode::View);
        assert_eq!(editor.command_buffer(), "");
    }

    #[test]
    fn command_escape_cancels() {
        let mut editor = new_editor(&["hello"]);
        feed(&mut editor, b":wq\x1b");
        assert_eq!(editor.mode(), Mode::View);
        assert_eq!(editor.command_buffer(), "");
        assert!(!editor.should_quit());
        assert!(editor.cursor().x < 5);
    }

    #[test]
    fn quit_command_sets_stop_flag() {
        let mut editor = new_editor(&[""]);
        feed(&mut editor, b":q\n");
        assert!(editor.should_quit());
        assert_eq!(editor.mode(), Mode::View);
    }

    #[test]
    fn unknown_command_is_silent() {
        let mut editor = new_editor(&["hello"]);
        feed(&mut editor, b":nope\n");
        assert_eq!(editor.mode(), Mode::View);
        assert_eq!(editor.command_buffer(), "");
        assert_eq!(editor.status_message(), None);
        assert!(!editor.should_quit());
    }

    #[test]
    fn cursor_is_clamped_after_command() {
        let mut editor = new_editor(&["abcdef"]);
        feed(&mut editor, b":nothing\n");
        assert_eq!(editor.cursor(), Position::new(5, 0));
    }

    #[test]
    fn write_without_any_filename_is_rejected() {
        let mut editor = new_editor(&[""]);
        feed(&mut editor, b":w\n");
        assert_eq!(
            editor.status_message(),
            Some(command::INVALID_FILENAME_MSG)
        );
        assert_eq!(editor.buffer().file_path, None);
    }

    #[test]
    fn write_uses_default_filename() {
        let dir = tempfile::tempdir().unwrap();
        let target = path_in(&dir, "out.txt");
        let mut editor = new_editor_with(
            &["hello"],
            Settings {
                default_filename: Some(target.clone()),
                ..Settings::default()
            },
        );
        feed(&mut editor, b":w\n");
        assert_eq!(fs::read_to_string(&target).unwrap(), "hello\n");
        assert_eq!(
            editor.status_message(),
            Some(format!("wrote: {target}").as_str())
        );
        assert_eq!(editor.buffer().file_path, None);
        assert!(!editor.should_quit());
    }

    #[test]
    fn write_prefers_current_filename() {
        let dir = tempfile::tempdir().unwrap();
        let current = path_in(&dir, "current.txt");
        let fallback = path_in(&dir, "fallback.txt");
        let mut editor = new_editor_with(
            &["data"],
            Settings {
                default_filename: Some(fallback.clone()),
                ..Settings::default()
            },
        );
        editor.buffer.file_path = Some(current.clone());
        feed(&mut editor, b":w\n");
        assert_eq!(fs::read_to_string(&current).unwrap(), "data\n");
        assert!(fs::metadata(&fallback).is_err());
    }

    #[test]
    fn write_quit_saves_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        let target = path_in(&dir, "wq.txt");
        let mut editor = new_editor(&["a", "b"]);
        editor.buffer.file_path = Some(target.clone());
        feed(&mut editor, b":wq\n");
        assert_eq!(fs::read_to_string(&target).unwrap(), "a\nb\n");
        assert!(editor.should_quit());
    }

    #[test]
    fn write_quit_without_filename_keeps_running() {
        let mut editor = new_editor(&["a"]);
        feed(&mut editor, b":wq\n");
        assert!(!editor.should_quit());
        assert_eq!(
            editor.status_message(),
            Some(command::INVALID_FILENAME_MSG)
        );
    }

    #[test]
    fn write_as_sets_current_filename() {
        let dir = tempfile::tempdir().unwrap();
        let target = path_in(&dir, "named.txt");
        let mut editor = new_editor(&["named"]);
        feed(&mut editor, format!(":w  {target} \n").as_bytes());
        assert_eq!(fs::read_to_string(&target).unwrap(), "named\n");
        assert_eq!(editor.buffer().file_path.as_deref(), Some(target.as_str()));
        assert_eq!(
            editor.status_message(),
            Some(format!("wrote: {target}").as_str())
        );
    }

    #[test]
    fn write_as_blank_name_is_rejected() {
        let mut editor = new_editor(&["x"]);
        feed(&mut editor, b":w   \n");
        assert_eq!(
            editor.status_message(),
            Some(command::INVALID_FILENAME_MSG)
        );
        assert_eq!(editor.buffer().file_path, None);
    }

    #[test]
    fn failed_save_is_reported_and_does_not_quit() {
        let dir = tempfile::tempdir().unwrap();
        let target = path_in(&dir, "missing/dir/out.txt");
        let mut editor = new_editor(&["x"]);
        editor.buffer.file_path = Some(target.clone());
        feed(&mut editor, b":wq\n");
        assert!(!editor.should_quit());
        let reason = fs::File::create(&target).unwrap_err();
        assert_eq!(
            editor.status_message(),
            Some(format!("could not save: {reason}").as_str())
        );
    }

    #[test]
    fn failed_write_as_keeps_old_filename() {
        let dir = tempfile::tempdir().unwrap();
        let bad = path_in(&dir, "missing/out.txt");
        let mut editor = new_editor(&["x"]);
        feed(&mut editor, format!(":w {bad}\n").as_bytes());
        assert_eq!(editor.buffer().file_path, None);
    }

    #[test]
    fn load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "in.txt");
        fs::write(&path, "one\ntwo\n").unwrap();
        let mut editor = new_editor(&[""]);
        editor.load_file(&path);
        assert_eq!(text(&editor), vec!["one", "two"]);
        assert_eq!(editor.status_message(), Some(format!("\"{path}\"").as_str()));
    }

    #[test]
    fn load_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "new.txt");
        let mut editor = new_editor(&[""]);
        editor.load_file(&path);
        assert_eq!(text(&editor), vec![""]);
        assert_eq!(editor.buffer().file_path.as_deref(), Some(path.as_str()));
        assert_eq!(
            editor.status_message(),
            Some(format!("\"{path}\" [new file]").as_str())
        );
    }

    #[test]
    fn status_message_expires() {
        let mut editor = new_editor(&[""]);
        editor.set_status_message("hi");
        assert!(!editor.expire_status(Duration::from_secs(3600)));
        assert_eq!(editor.status_message(), Some("hi"));
        assert!(editor.expire_status(Duration::ZERO));
        assert_eq!(editor.status_message(), None);
        assert!(!editor.expire_status(Duration::ZERO));
    }

    #[test]
    fn redraw_flag_is_set_by_input() {
        let mut editor = new_editor(&[""]);
        assert!(editor.take_needs_redraw());
        assert!(!editor.take_needs_redraw());
        feed(&mut editor, b"l");
        assert!(editor.take_needs_redraw());
        editor.mark_needs_redraw();
        assert!(editor.take_needs_redraw());
    }

    #[test]
    fn frame_shows_text_and_tildes() {
        let editor = new_editor(&["a\tb", "c"]);
        let frame = editor.frame();
        assert_eq!(frame.rows.len(), 23);
        assert_eq!(frame.rows[0], b"a   b");
        assert_eq!(frame.rows[1], b"c");
        assert_eq!(frame.rows[2], b"~");
        assert_eq!(frame.cursor, Position::new(0, 0));
        assert_eq!(frame.cursor_shape, CursorShape::Block);
    }

    #[test]
    fn frame_cursor_uses_visual_column() {
        let mut editor = new_editor(&["\tab"]);
        feed(&mut editor, b"ll");
        assert_eq!(editor.cursor().x, 2);
        assert_eq!(editor.frame().cursor, Position::new(5, 0));
    }

    #[test]
    fn frame_line_numbers() {
        let lines: Vec<String> = (1..=12).map(|n| format!("line {n}")).collect();
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut editor = new_editor_with(
            &lines,
            Settings {
                show_line_numbers: true,
                ..Settings::default()
            },
        );
        feed(&mut editor, b"ll");
        let frame = editor.frame();
        assert_eq!(frame.rows[0], b" 1 line 1");
        assert_eq!(frame.rows[11], b"12 line 12");
        assert_eq!(frame.rows[12], b"   ~");
        assert_eq!(frame.cursor, Position::new(5, 0));
    }

    #[test]
    fn frame_in_edit_and_command_modes() {
        let mut editor = new_editor(&["abc"]);
        feed(&mut editor, b"A");
        let frame = editor.frame();
        assert_eq!(frame.cursor_shape, CursorShape::Bar);
        assert_eq!(frame.cursor, Position::new(3, 0));

        feed(&mut editor, b"\x1b:w");
        let frame = editor.frame();
        assert_eq!(frame.status_line, ":w");
        assert_eq!(frame.cursor, Position::new(2, 23));
        assert_eq!(frame.cursor_shape, CursorShape::Block);
    }

    #[test]
    fn frame_scrolls_to_cursor() {
        let lines: Vec<String> = (0..10).map(|n| n.to_string()).collect();
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut editor = Editor::new(
            Settings::default(),
            FileBuffer::from_lines(lines.iter().copied()),
            Size {
                width: 10,
                height: 5,
            },
        );
        feed(&mut editor, b"jjjjjj");
        let frame = editor.frame();
        assert_eq!(frame.rows.len(), 4);
        assert_eq!(frame.rows[0], b"3");
        assert_eq!(frame.rows[3], b"6");
        assert_eq!(frame.cursor, Position::new(0, 3));

        feed(&mut editor, b"kkkkkk");
        assert_eq!(editor.frame().rows[0], b"0");
    }

    #[test]
    fn resize_keeps_cursor_visible() {
        let lines: Vec<String> = (0..30).map(|n| n.to_string()).collect();
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut editor = new_editor(&lines);
        for _ in 0..20 {
            feed(&mut editor, b"j");
        }
        editor.take_needs_redraw();
        editor.update_window_size(Size {
            width: 40,
            height: 6,
        });
        assert!(editor.take_needs_redraw());
        let frame = editor.frame();
        assert_eq!(frame.rows.len(), 5);
        assert_eq!(frame.rows[4], b"20");
        assert_eq!(frame.width, 40);
    }

    #[test]
    fn frame_truncates_long_rows() {
        let long = "x".repeat(200);
        let editor = new_editor(&[long.as_str()]);
        assert_eq!(editor.frame().rows[0].len(), 80);
    }

    #[test]
    fn frame_carries_status_message() {
        let mut editor = new_editor(&[""]);
        editor.set_status_message(command::NO_FILE_MSG);
        assert_eq!(
            editor.frame().status_message.as_deref(),
            Some("No file selected")
        );
    }
}
