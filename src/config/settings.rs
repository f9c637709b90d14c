//! Application settings and Telegram configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Telegram API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Telegram API ID (obtain from <https://my.telegram.org>).
    pub api_id: i32,

    /// Telegram API hash (obtain from <https://my.telegram.org>).
    pub api_hash: String,

    /// Bot token issued by `@BotFather`. Only needed for the first sign-in.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Path to the session file.
    #[serde(default = "default_session_path")]
    pub session_path: PathBuf,
}

fn default_session_path() -> PathBuf {
    PathBuf::from("bot.session")
}

impl TelegramConfig {
    /// Creates a new Telegram configuration.
    #[must_use]
    pub fn new(api_id: i32, api_hash: String) -> Self {
        Self {
            api_id,
            api_hash,
            bot_token: None,
            session_path: default_session_path(),
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Expects `TG_API_ID` and `TG_API_HASH` to be set. `TG_BOT_TOKEN` and
    /// `TG_SESSION_PATH` are optional.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_id: i32 = std::env::var("TG_API_ID")
            .map_err(|_| ConfigError::MissingEnvVar("TG_API_ID"))?
            .parse()
            .map_err(|_| ConfigError::InvalidApiId)?;

        let api_hash = std::env::var("TG_API_HASH")
            .map_err(|_| ConfigError::MissingEnvVar("TG_API_HASH"))?;

        let bot_token = std::env::var("TG_BOT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let session_path = std::env::var("TG_SESSION_PATH")
            .map_or_else(|_| default_session_path(), PathBuf::from);

        Ok(Self {
            api_id,
            api_hash,
            bot_token,
            session_path,
        })
    }
}

/// Bot-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSettings {
    /// User IDs allowed to run profile commands. Empty allows everyone.
    #[serde(default)]
    pub owner_ids: Vec<i64>,

    /// Language code sent with every profile call (empty = all languages).
    #[serde(default)]
    pub lang_code: String,

    /// Whether to publish the command list to Telegram on startup.
    #[serde(default = "default_register_commands")]
    pub register_commands: bool,
}

fn default_register_commands() -> bool {
    true
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            owner_ids: Vec::new(),
            lang_code: String::new(),
            register_commands: default_register_commands(),
        }
    }
}

impl BotSettings {
    /// Creates bot settings from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `OWNER_IDS` contains something that is not a user ID.
    pub fn from_env_with_defaults() -> Result<Self, ConfigError> {
        let owner_ids = match std::env::var("OWNER_IDS") {
            Ok(raw) => parse_owner_ids(&raw)?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            owner_ids,
            lang_code: std::env::var("PROFILE_LANG_CODE").unwrap_or_default(),
            register_commands: std::env::var("REGISTER_COMMANDS")
                .ok()
                .and_then(|s| parse_bool(&s))
                .unwrap_or_else(default_register_commands),
        })
    }

    /// Checks whether a sender may run profile commands.
    #[must_use]
    pub fn is_operator(&self, sender_id: Option<i64>) -> bool {
        if self.owner_ids.is_empty() {
            return true;
        }
        sender_id.is_some_and(|id| self.owner_ids.contains(&id))
    }
}

/// Parses a comma-separated list of user IDs.
fn parse_owner_ids(raw: &str) -> Result<Vec<i64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| ConfigError::InvalidOwnerId(s.to_owned()))
        })
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid API ID format (must be a positive integer)")]
    InvalidApiId,

    #[error("Invalid user ID in OWNER_IDS: '{0}'")]
    InvalidOwnerId(String),
}
