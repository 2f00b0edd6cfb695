//! Server configuration from the environment.
//!
//! | Variable               | Default             |
//! |------------------------|---------------------|
//! | `QRQUEST_BIND`         | `0.0.0.0:8000`      |
//! | `QRQUEST_HINTS_FILE`   | `hints.json`        |
//! | `QRQUEST_RESULTS_FILE` | `game_results.json` |
//! | `QRQUEST_GAME_MINUTES` | `60`                |
//!
//! The binary loads a `.env` file (if present) before reading these.

use std::env;
use std::path::PathBuf;

use crate::QuestError;

/// Everything needed to start a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub hints_path: PathBuf,
    pub results_path: PathBuf,
    pub game_duration_minutes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            hints_path: PathBuf::from("hints.json"),
            results_path: PathBuf::from("game_results.json"),
            game_duration_minutes: 60,
        }
    }
}

impl ServerConfig {
    /// Reads the config from process environment variables.
    ///
    /// # Errors
    /// Returns [`QuestError::Config`] if `QRQUEST_GAME_MINUTES` isn't a
    /// positive integer or is too large to express in seconds.
    pub fn from_env() -> Result<Self, QuestError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the config through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, QuestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let game_duration_minutes = match lookup("QRQUEST_GAME_MINUTES") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(minutes) if minutes > 0 && minutes.checked_mul(60).is_some() => minutes,
                _ => {
                    return Err(QuestError::Config(format!(
                        "QRQUEST_GAME_MINUTES must be a positive number of minutes \
                         that fits in u64 seconds, got {raw:?}"
                    )));
                }
            },
            None => defaults.game_duration_minutes,
        };

        Ok(Self {
            bind_addr: lookup("QRQUEST_BIND").unwrap_or(defaults.bind_addr),
            hints_path: lookup("QRQUEST_HINTS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.hints_path),
            results_path: lookup("QRQUEST_RESULTS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.results_path),
            game_duration_minutes,
        })
    }
}
