//! Configuration module for the profile bot.
//!
//! Handles platform limits, environment-driven settings, and the
//! profile file format used by `--apply`, `--export` and the validator.

mod profile;
mod settings;

pub use profile::{ProfileConfig, ProfileField, ValidationError, validate_field};
pub use settings::{BotSettings, ConfigError, TelegramConfig};

/// Maximum length of a bot's display name.
pub const MAX_NAME_LENGTH: usize = 64;

/// Maximum length of a bot's description (shown in an empty chat).
pub const MAX_DESCRIPTION_LENGTH: usize = 512;

/// Maximum length of a bot's short description (shown on the profile page).
pub const MAX_SHORT_DESCRIPTION_LENGTH: usize = 120;
