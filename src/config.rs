//! Server settings, read from the environment.

use std::env;
use std::fmt::{self, Display};
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{info, warn};

use crate::error::{PhonebookError, Result};

/// port the directory service listens on when `PORT` is not set
pub const DEFAULT_PORT: u16 = 3001;
/// directory holding the sled database when `PHONEBOOK_DB` is not set
pub const DEFAULT_DB_PATH: &str = "phonebook-db";

/// The storage engine the server runs on
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineKind {
    /// the persistent sled engine
    Sled,
    /// the in-memory engine, contacts are lost on shutdown
    Memory,
}

impl FromStr for EngineKind {
    type Err = PhonebookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sled" => Ok(EngineKind::Sled),
            "memory" => Ok(EngineKind::Memory),
            other => Err(PhonebookError::Parsing(format!(
                "unknown engine '{other}', expected 'sled' or 'memory'"
            ))),
        }
    }
}

impl Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Sled => write!(f, "sled"),
            EngineKind::Memory => write!(f, "memory"),
        }
    }
}

/// Settings for the directory service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// TCP port to listen on, on all interfaces
    pub port: u16,
    /// which storage engine to run on
    pub engine: EngineKind,
    /// directory of the sled database, the store's "connection string"
    pub db_path: PathBuf,
    /// optional directory of a built front end to serve for non-API paths
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            engine: EngineKind::Sled,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            static_dir: None,
        }
    }
}

impl Config {
    /// loads the settings from `PORT`, `PHONEBOOK_ENGINE`, `PHONEBOOK_DB` and
    /// `PHONEBOOK_STATIC_DIR`, falling back to the defaults for unset variables
    ///
    /// # Errors
    /// returns [`PhonebookError::Parsing`] if a variable is set to an unusable value
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();
        Ok(Config {
            port: try_load("PORT", defaults.port)?,
            engine: try_load("PHONEBOOK_ENGINE", defaults.engine)?,
            db_path: var("PHONEBOOK_DB")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            static_dir: var("PHONEBOOK_STATIC_DIR").map(PathBuf::from),
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|e| {
            warn!("Invalid {key} value: {e}");
            PhonebookError::Parsing(format!("invalid {key} value '{raw}': {e}"))
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_kind_parses_case_insensitively() {
        assert_eq!("Sled".parse::<EngineKind>().unwrap(), EngineKind::Sled);
        assert_eq!(" memory ".parse::<EngineKind>().unwrap(), EngineKind::Memory);
        assert!("mongo".parse::<EngineKind>().is_err());
    }

    #[test]
    fn defaults_listen_on_3001() {
        let config = Config::default();
        assert_eq!(config.port, 3001);
        assert_eq!(config.engine, EngineKind::Sled);
        assert!(config.static_dir.is_none());
    }
}
