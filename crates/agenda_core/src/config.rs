//! Runtime configuration read from `AGENDA_*` environment variables.
//!
//! | Variable           | Meaning                                   |
//! |--------------------|-------------------------------------------|
//! | `AGENDA_DB_PATH`   | Store file; unset means an in-memory store |
//! | `AGENDA_LOG_LEVEL` | One of trace, debug, info, warn, error    |
//! | `AGENDA_LOG_DIR`   | Absolute directory for rolling log files  |
//!
//! A `.env` file in the working directory is loaded first when present.

use crate::logging::{default_log_level, normalize_level};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const ENV_PREFIX: &str = "AGENDA_";

/// Configuration failures. Never raised as panics.
#[derive(Debug)]
pub enum ConfigError {
    Dotenv(dotenvy::Error),
    Env(envy::Error),
    InvalidValue { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dotenv(err) => write!(f, "failed to load .env file: {err}"),
            Self::Env(err) => write!(f, "failed to read environment: {err}"),
            Self::InvalidValue { key, message } => write!(f, "{ENV_PREFIX}{key}: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Dotenv(err) => Some(err),
            Self::Env(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

#[derive(Deserialize, Debug)]
struct RawConfig {
    db_path: Option<PathBuf>,
    log_level: Option<String>,
    log_dir: Option<PathBuf>,
}

/// Validated runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaConfig {
    pub db_path: Option<PathBuf>,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
}

impl AgendaConfig {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(err) if err.not_found() => {}
            Err(err) => return Err(ConfigError::Dotenv(err)),
        }

        let raw = envy::prefixed(ENV_PREFIX)
            .from_env::<RawConfig>()
            .map_err(ConfigError::Env)?;
        Self::from_raw(raw)
    }

    /// Reads configuration from explicit `(KEY, value)` pairs.
    pub fn from_iter<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let raw = envy::prefixed(ENV_PREFIX)
            .from_iter::<_, RawConfig>(vars)
            .map_err(ConfigError::Env)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let log_level = match raw.log_level.as_deref().map(str::trim) {
            None | Some("") => default_log_level(),
            Some(level) => normalize_level(level).map_err(|message| ConfigError::InvalidValue {
                key: "LOG_LEVEL",
                message,
            })?,
        };

        let log_dir = non_empty(raw.log_dir);
        if let Some(dir) = log_dir.as_ref() {
            if !dir.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    key: "LOG_DIR",
                    message: format!("must be an absolute path, got `{}`", dir.display()),
                });
            }
        }

        Ok(Self {
            db_path: non_empty(raw.db_path),
            log_level,
            log_dir,
        })
    }
}

fn non_empty(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|value| !value.as_os_str().is_empty())
}
