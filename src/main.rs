#![warn(clippy::all, clippy::pedantic)]
mod command;
mod config;
mod editor;
mod error;
mod filebuffer;
mod layout;
mod renderer;
mod terminal;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser};
use config::{Config, Settings};
use editor::ByteSource;
use error::ConfigError;
use etcetera::base_strategy::{choose_base_strategy, BaseStrategy};
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

pub use editor::{Editor, Mode};
pub use filebuffer::{FileBuffer, Position};
pub use terminal::{Size, Terminal};

const POLL_TIMEOUT: Duration = Duration::from_secs(1);
const STATUS_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "qedit", version, about = "A small modal text editor", long_about = None)]
struct Cli {
    /// File to open
    file: Option<String>,

    /// Load configuration from a specific file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config_file: Option<PathBuf>,

    /// Save logs to a specific file
    #[arg(long = "log", value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (repeat for more detail)
    #[arg(short = 'v', action = ArgAction::Count)]
    verbosity: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(err) = setup_logging(cli.verbosity, cli.log_file) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let (settings, config_error) = load_settings(cli.config_file.as_deref());
    let terminal = Terminal::new().context("failed to initialize terminal")?;
    let mut editor = Editor::new(settings, FileBuffer::default(), *terminal.size());
    match cli.file.as_deref() {
        Some(path) => editor.load_file(path),
        None => editor.set_status_message(command::NO_FILE_MSG),
    }
    if let Some(err) = config_error {
        editor.set_status_message(err.to_string());
    }

    run(&mut editor, terminal)
}

/// Takes the editor and the terminal it draws on.
/// Alternates between drawing and handling one input event until the
/// editor asks to stop.
///
/// # Errors
///
/// Returns an error if the terminal can no longer be read or written.
fn run(editor: &mut Editor, mut terminal: Terminal) -> Result<()> {
    let mut stdout = io::stdout();
    loop {
        if editor.take_needs_redraw() {
            renderer::draw(&editor.frame(), &mut stdout)?;
        }
        if editor.should_quit() {
            log::info!("quitting");
            break;
        }
        let ready = terminal.wait_for_input(POLL_TIMEOUT)?;
        if terminal.take_resume() {
            editor.mark_needs_redraw();
        }
        if let Some(size) = terminal.take_resize() {
            editor.update_window_size(size);
        }
        if ready {
            if let Some(byte) = terminal.read_byte() {
                editor.process_byte(byte, &mut terminal);
            }
        } else {
            editor.expire_status(STATUS_LIFETIME);
        }
    }
    Ok(())
}

/// Takes an optional config path.
/// Resolves the settings, falling back to defaults when the
/// configuration cannot be used.
fn load_settings(path: Option<&Path>) -> (Settings, Option<ConfigError>) {
    let config = match path {
        Some(path) => Config::load(path),
        None => Config::default_path().and_then(|path| Config::load(&path)),
    };
    match config.and_then(|config| Settings::from_config(&config)) {
        Ok(settings) => {
            log::debug!("{settings:?}");
            (settings, None)
        }
        Err(err) => {
            log::warn!("{err}, using default settings");
            (Settings::default(), Some(err))
        }
    }
}

fn default_log_file() -> Result<PathBuf> {
    let strategy =
        choose_base_strategy().map_err(|_| anyhow!("could not find the cache directory"))?;
    Ok(strategy.cache_dir().join("qedit.log"))
}

/// Takes the `-v` count and an optional log path.
/// Sends log records to a file so they never land on the editor screen.
fn setup_logging(verbosity: u8, log_file: Option<PathBuf>) -> Result<()> {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let log_file = match log_file {
        Some(path) => path,
        None => default_log_file()?,
    };
    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("could not create {}", parent.display()))?;
    }

    fern::Dispatch::new()
        .level(level)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {} [{}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.target(),
                record.level(),
                message
            ));
        })
        .chain(fern::log_file(&log_file)?)
        .apply()?;
    Ok(())
}
