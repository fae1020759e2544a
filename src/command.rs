#![warn(clippy::all, clippy::pedantic)]
//! `:` command parsing.

pub const WRITE: &str = ":w";
pub const QUIT: &str = ":q";
pub const WRITE_QUIT: &str = ":wq";

pub const WROTE_TO: &str = "wrote: ";
pub const INVALID_FILENAME_MSG: &str = "Invalid filename.";
pub const NO_FILE_MSG: &str = "No file selected";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Save to the current or default file
    Write,
    /// Stop the editor
    Quit,
    /// Save, then stop if the save happened
    WriteQuit,
    /// Save to the given file, which becomes the current file.
    /// Empty when nothing but spaces followed `:w `.
    WriteAs(String),
    /// Anything else
    Unknown(String),
}

/// Takes the command text, leading `:` included.
/// Returns the command it names.
#[must_use]
pub fn parse_command(text: &str) -> Command {
    match text {
        WRITE => Command::Write,
        QUIT => Command::Quit,
        WRITE_QUIT => Command::WriteQuit,
        _ => match text.strip_prefix(WRITE).and_then(|rest| rest.strip_prefix(' ')) {
            Some(name) => Command::WriteAs(name.trim().to_string()),
            None => Command::Unknown(text.to_string()),
        },
    }
}
