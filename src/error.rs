#![warn(clippy::all, clippy::pedantic)]
use std::{io, path::PathBuf};
use thiserror::Error;

/// Failures while loading or saving a buffer.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("could not open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("could not save: {0}")]
    Save(#[source] io::Error),
}

impl FileError {
    /// Takes a path and the `io::Error` raised while opening it.
    /// Classifies the failure.
    pub fn open(path: &str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            FileError::NotFound(path.to_string())
        } else {
            FileError::Open {
                path: path.to_string(),
                source,
            }
        }
    }
}

/// Failures while reading `.qeditrc`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration error: could not determine home directory")]
    HomeDir,

    #[error("configuration error: could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("configuration error: line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("configuration error: empty key at line {line}")]
    EmptyKey { line: usize },

    #[error("configuration error: invalid value for '{key}', expected {expected}")]
    Value { key: String, expected: &'static str },
}
