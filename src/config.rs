#![warn(clippy::all, clippy::pedantic)]
use crate::error::ConfigError;
use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

pub const CONFIG_FILENAME: &str = ".qeditrc";

const DEFAULT_TAB_WIDTH: usize = 4;
const MAX_TAB_WIDTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

/// Raw `key = value` pairs read from the rc file.
#[derive(Debug, Default)]
pub struct Config {
    values: HashMap<String, ConfigValue>,
}

impl Config {
    /// Takes nothing.
    /// Returns `~/.qeditrc`.
    ///
    /// # Errors
    ///
    /// Will return an error if the home directory cannot be found.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        etcetera::home_dir()
            .map(|home| home.join(CONFIG_FILENAME))
            .map_err(|_| ConfigError::HomeDir)
    }

    /// Takes a path.
    /// Reads and parses the file there. A missing file yields an
    /// empty `Config`.
    ///
    /// # Errors
    ///
    /// Will return an error if the file exists but cannot be read,
    /// or if any of its lines is malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => {
                log::debug!("reading configuration from {}", path.display());
                Self::parse(&text)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("no configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Takes the text of an rc file.
    /// Builds a `Config` from it.
    ///
    /// # Errors
    ///
    /// Will return an error on a line without `=`, an empty key,
    /// or an integer that does not fit.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for (idx, line) in text.lines().enumerate() {
            let line_num = idx + 1;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Parse {
                    line: line_num,
                    message: format!("missing '=' in '{line}'"),
                });
            };
            let key = trim(key);
            if key.is_empty() {
                return Err(ConfigError::EmptyKey { line: line_num });
            }
            let value = classify(key, trim(value))?;
            config.set(key, value);
        }
        Ok(config)
    }

    pub fn set(&mut self, key: impl Into<String>, value: ConfigValue) {
        self.values.insert(key.into(), value);
    }

    /// Takes itself and a key.
    /// Returns the value as a string. Integers are rendered back to text.
    ///
    /// # Errors
    ///
    /// Will return an error if the value is a boolean.
    pub fn get_string(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(ConfigValue::Str(s)) => Ok(Some(s.clone())),
            Some(ConfigValue::Int(n)) => Ok(Some(n.to_string())),
            Some(ConfigValue::Bool(_)) => Err(mismatch(key, "string")),
        }
    }

    /// # Errors
    ///
    /// Will return an error if the value is not an integer.
    pub fn get_int(&self, key: &str) -> Result<Option<i64>, ConfigError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(ConfigValue::Int(n)) => Ok(Some(*n)),
            Some(_) => Err(mismatch(key, "integer")),
        }
    }

    /// # Errors
    ///
    /// Will return an error if the value is neither a boolean nor 0/1.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(ConfigValue::Bool(b)) => Ok(Some(*b)),
            Some(ConfigValue::Int(0)) => Ok(Some(false)),
            Some(ConfigValue::Int(1)) => Ok(Some(true)),
            Some(_) => Err(mismatch(key, "boolean")),
        }
    }
}

fn mismatch(key: &str, expected: &'static str) -> ConfigError {
    ConfigError::Value {
        key: key.to_string(),
        expected,
    }
}

fn trim(s: &str) -> &str {
    s.trim_matches(|c| c == ' ' || c == '\t')
}

fn classify(key: &str, value: &str) -> Result<ConfigValue, ConfigError> {
    Ok(match value {
        "true" | "yes" => ConfigValue::Bool(true),
        "false" | "no" => ConfigValue::Bool(false),
        digits if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            ConfigValue::Int(
                digits
                    .parse()
                    .map_err(|_| mismatch(key, "value within valid range"))?,
            )
        }
        other => ConfigValue::Str(other.to_string()),
    })
}

/// The settings the editor reads once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tab_width: usize,
    pub show_line_numbers: bool,
    pub default_filename: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            show_line_numbers: false,
            default_filename: None,
        }
    }
}

impl Settings {
    /// Takes a `Config`.
    /// Resolves `tab_width`, `show_line_numbers` and `default_filename`.
    ///
    /// # Errors
    ///
    /// Will return an error if a key has the wrong type or `tab_width`
    /// is outside 1..=32.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        if let Some(width) = config.get_int("tab_width")? {
            settings.tab_width = usize::try_from(width)
                .ok()
                .filter(|w| (1..=MAX_TAB_WIDTH).contains(w))
                .ok_or_else(|| mismatch("tab_width", "integer from 1 to 32"))?;
        }
        if let Some(show) = config.get_bool("show_line_numbers")? {
            settings.show_line_numbers = show;
        }
        settings.default_filename = config
            .get_string("default_filename")?
            .filter(|name| !name.is_empty());
        Ok(settings)
    }
}
