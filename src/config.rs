//! Configuration management for daymatrix.
//!
//! Configuration comes from environment variables (a `.env` file is
//! loaded first if present):
//! - `OPENAI_API_KEY` - Optional at boot; `/api/analyze` fails with a
//!   configuration error until it is set.
//! - `OPENAI_MODEL` - Optional. Defaults to `gpt-4o-mini`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `PUBLIC_DIR` - Optional. Static asset directory. Defaults to `public`.
//! - `REMINDER_INTERVAL_SECS` - Optional. Reminder cadence. Defaults to `900`.

use std::path::PathBuf;

use thiserror::Error;

use crate::llm::DEFAULT_MODEL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key; absent means analysis requests are rejected
    pub api_key: Option<String>,

    /// Model used for task classification
    pub model: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Directory with the static front-end assets
    pub public_dir: PathBuf,

    /// Seconds between focus reminders
    pub reminder_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when a numeric variable fails
    /// to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{e}")))?;

        let public_dir = std::env::var("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"));

        let reminder_interval_secs = std::env::var("REMINDER_INTERVAL_SECS")
            .unwrap_or_else(|_| "900".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("REMINDER_INTERVAL_SECS".to_string(), format!("{e}"))
            })?;

        Ok(Self {
            api_key,
            model,
            host,
            port,
            public_dir,
            reminder_interval_secs,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            api_key,
            model,
            host: "127.0.0.1".to_string(),
            port: 3000,
            public_dir: PathBuf::from("public"),
            reminder_interval_secs: 900,
        }
    }
}
