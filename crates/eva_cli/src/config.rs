//! Startup configuration.
//!
//! Resolved once in `main` and passed down by value. Environment overrides:
//! - `EVA_DB_PATH`: database file (default `<home>/.eva/eva.db`)
//! - `EVA_LOG_DIR`: log directory (default `<home>/.eva/logs`)
//! - `EVA_LOG_LEVEL`: `trace|debug|info|warn|error`

use eva_core::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const DATA_DIR_NAME: &str = ".eva";
const DB_FILE_NAME: &str = "eva.db";
const LOG_DIR_NAME: &str = "logs";

pub const DB_PATH_ENV: &str = "EVA_DB_PATH";
pub const LOG_DIR_ENV: &str = "EVA_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "EVA_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// `None` when neither an override nor a home directory exists; file
    /// logging is then skipped.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No home directory and no database path override.
    HomeDirUnavailable(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HomeDirUnavailable(var) => write!(
                f,
                "cannot determine home directory; set {var} to choose a location"
            ),
        }
    }
}

impl Error for ConfigError {}

impl AppConfig {
    /// Reads the process environment and the user's home directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(|key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Resolves configuration from an arbitrary variable lookup.
    ///
    /// Empty or whitespace-only values count as unset.
    pub fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let data_dir = home.map(|home| home.join(DATA_DIR_NAME));

        let db_path = match var(DB_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => data_dir
                .as_ref()
                .map(|dir| dir.join(DB_FILE_NAME))
                .ok_or(ConfigError::HomeDirUnavailable(DB_PATH_ENV))?,
        };

        let log_dir = var(LOG_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| data_dir.as_ref().map(|dir| dir.join(LOG_DIR_NAME)));

        let log_level = var(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string());

        Ok(Self {
            db_path,
            log_dir,
            log_level,
        })
    }
}
