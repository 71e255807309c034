//! Store configuration.

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::error::{StoreError, StoreResult};

const DEFAULT_DB_PATH: &str = "wardbook.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Configuration for the relational store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// How long a unit of work waits on a locked database, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Enforce foreign keys (needed for the schedule's weak staff reference).
    #[serde(default = "default_foreign_keys")]
    pub foreign_keys: bool,
}

fn default_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_PATH)
}

const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

const fn default_foreign_keys() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            foreign_keys: true,
        }
    }
}

impl StoreConfig {
    /// Config for a database at `path` with default settings.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_busy_timeout_ms(mut self, busy_timeout_ms: u64) -> Self {
        self.busy_timeout_ms = busy_timeout_ms;
        self
    }

    pub fn with_foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    /// Read `WARDBOOK_DB_PATH`, `WARDBOOK_BUSY_TIMEOUT_MS` and
    /// `WARDBOOK_FOREIGN_KEYS`, after loading `.env` if one exists.
    /// Unset variables keep their defaults.
    pub fn from_env() -> StoreResult<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        if let Ok(path) = env::var("WARDBOOK_DB_PATH") {
            config.path = PathBuf::from(path);
        }
        if let Ok(raw) = env::var("WARDBOOK_BUSY_TIMEOUT_MS") {
            config.busy_timeout_ms = raw.parse().map_err(|e: std::num::ParseIntError| {
                StoreError::config("WARDBOOK_BUSY_TIMEOUT_MS", e.to_string())
            })?;
        }
        if let Ok(raw) = env::var("WARDBOOK_FOREIGN_KEYS") {
            config.foreign_keys = parse_flag(&raw).ok_or_else(|| {
                StoreError::config("WARDBOOK_FOREIGN_KEYS", format!("not a boolean: '{}'", raw))
            })?;
        }
        Ok(config)
    }
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
