#![warn(clippy::all, clippy::pedantic)]
use crate::editor::{ByteSource, BACKSPACE, ESC};
use crossterm::{
    cursor::{MoveTo, SetCursorStyle, Show},
    event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::{
    collections::VecDeque,
    io::{self, stdout},
    time::Duration,
};

const FALLBACK_SIZE: Size = Size {
    width: 80,
    height: 24,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Default for Size {
    fn default() -> Self {
        FALLBACK_SIZE
    }
}

/// Raw-mode terminal on the alternate screen. Restores the terminal
/// when dropped.
pub struct Terminal {
    size: Size,
    pending: VecDeque<u8>,
    resized: Option<Size>,
    resumed: bool,
}

impl Terminal {
    /// Takes nothing.
    /// Creates a new `Terminal`.
    ///
    /// # Errors
    ///
    /// Will return an error if raw mode or the alternate screen
    /// cannot be entered.
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        // built before the screen setup so a failure below still restores raw mode
        let terminal = Self {
            size: Self::query_size(),
            pending: VecDeque::new(),
            resized: None,
            resumed: false,
        };
        Self::enter_screen()?;
        Ok(terminal)
    }

    fn enter_screen() -> io::Result<()> {
        execute!(
            stdout(),
            EnterAlternateScreen,
            Clear(ClearType::All),
            MoveTo(0, 0),
            DisableLineWrap
        )
    }

    fn leave_screen() -> io::Result<()> {
        execute!(
            stdout(),
            SetCursorStyle::DefaultUserShape,
            Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )
    }

    /// Takes nothing.
    /// Returns the terminal's size, or 80x24 if it cannot be determined.
    #[must_use]
    pub fn query_size() -> Size {
        match crossterm::terminal::size() {
            Ok((width, height)) if width > 0 && height > 0 => Size { width, height },
            Ok(_) => {
                log::warn!("terminal reported an empty size, assuming 80x24");
                FALLBACK_SIZE
            }
            Err(err) => {
                log::warn!("could not determine terminal size ({err}), assuming 80x24");
                FALLBACK_SIZE
            }
        }
    }

    /// Takes itself.
    /// Returns the terminal's size.
    #[must_use]
    pub fn size(&self) -> &Size {
        &self.size
    }

    /// Takes itself and a timeout.
    /// Waits for the next terminal event and queues the bytes of a key
    /// press. Returns whether input is ready.
    ///
    /// # Errors
    ///
    /// Will return an error if the event cannot be polled or read.
    pub fn wait_for_input(&mut self, timeout: Duration) -> io::Result<bool> {
        if !self.pending.is_empty() {
            return Ok(true);
        }
        if !poll(timeout)? {
            return Ok(false);
        }
        match read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release && is_suspend_key(key) => {
                self.suspend()?;
            }
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                self.pending.extend(key_to_bytes(key));
            }
            Event::Resize(width, height) => {
                log::debug!("terminal resized to {width}x{height}");
                self.size = if width > 0 && height > 0 {
                    Size { width, height }
                } else {
                    FALLBACK_SIZE
                };
                self.resized = Some(self.size);
            }
            _ => (),
        }
        Ok(!self.pending.is_empty())
    }

    /// Takes itself.
    /// Returns the new size if the terminal was resized since the last call.
    pub fn take_resize(&mut self) -> Option<Size> {
        self.resized.take()
    }

    /// Takes itself.
    /// Returns whether the process was stopped and continued since the
    /// last call. The screen has been cleared when this is true.
    pub fn take_resume(&mut self) -> bool {
        std::mem::take(&mut self.resumed)
    }

    /// Takes itself.
    /// Hands the terminal back to the shell and stops the process. In
    /// raw mode Ctrl+Z arrives as a key rather than a stop signal, so
    /// the signal is raised here. Once continued, the alternate screen
    /// and raw mode are entered again and the size is re-read.
    ///
    /// # Errors
    ///
    /// Will return an error if the terminal cannot be restored or
    /// re-entered.
    #[cfg(unix)]
    fn suspend(&mut self) -> io::Result<()> {
        log::info!("suspending");
        Self::leave_screen()?;
        disable_raw_mode()?;
        // SAFETY: raise only delivers a signal to this process; SIGTSTP keeps
        // its default disposition, so this returns after SIGCONT.
        if unsafe { libc::raise(libc::SIGTSTP) } != 0 {
            log::warn!("could not stop: {}", io::Error::last_os_error());
        }
        enable_raw_mode()?;
        Self::enter_screen()?;
        log::info!("resumed");
        let size = Self::query_size();
        if size != self.size {
            self.size = size;
            self.resized = Some(size);
        }
        self.resumed = true;
        Ok(())
    }

    #[cfg(not(unix))]
    #[allow(clippy::unnecessary_wraps, clippy::unused_self)]
    fn suspend(&mut self) -> io::Result<()> {
        log::debug!("job control is not available, ignoring suspend");
        Ok(())
    }
}

impl ByteSource for Terminal {
    fn read_byte(&mut self) -> Option<u8> {
        self.pending.pop_front()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = Self::leave_screen();
        let _ = disable_raw_mode();
    }
}

/// Takes a `KeyEvent`.
/// Returns whether it is Ctrl+Z, which stops the editor like a shell job.
#[must_use]
pub fn is_suspend_key(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('z') && key.modifiers == KeyModifiers::CONTROL
}

/// Takes a `KeyEvent`.
/// Returns the bytes a raw terminal would have sent for it. Keys with
/// no single-byte form produce nothing.
#[must_use]
pub fn key_to_bytes(key: KeyEvent) -> Vec<u8> {
    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            u8::try_from(c.to_ascii_lowercase())
                .ok()
                .filter(u8::is_ascii_lowercase)
                .map(|b| vec![b & 0x1f])
                .unwrap_or_default()
        }
        KeyCode::Char(c) if c.is_ascii() => u8::try_from(c).map(|b| vec![b]).unwrap_or_default(),
        KeyCode::Enter => vec![b'\n'],
        KeyCode::Tab => vec![b'\t'],
        KeyCode::Esc => vec![ESC],
        KeyCode::Backspace => vec![BACKSPACE],
        KeyCode::Up => vec![ESC, b'[', b'A'],
        KeyCode::Down => vec![ESC, b'[', b'B'],
        KeyCode::Right => vec![ESC, b'[', b'C'],
        KeyCode::Left => vec![ESC, b'[', b'D'],
        _ => Vec::new(),
    }
}
