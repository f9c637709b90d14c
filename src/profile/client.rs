//! The remote profile client interface.

use async_trait::async_trait;
use thiserror::Error;

use super::ProfileField;
use crate::telegram::TelegramError;

/// Errors returned by a [`ProfileClient`].
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Telegram rejected or failed the request, including transport
    /// and session failures.
    #[error(transparent)]
    Telegram(#[from] TelegramError),

    /// A failure that did not come from the Telegram client.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Reads and writes the bot's own profile on the platform.
///
/// Every call takes a language code; an empty code addresses the
/// profile shown to users without a dedicated translation. Setters
/// return the platform's success flag.
#[async_trait]
pub trait ProfileClient: Send + Sync {
    /// Returns the bot's display name.
    async fn get_my_name(&self, lang_code: &str) -> Result<String, ProfileError>;

    /// Sets the bot's display name (at most 64 characters).
    async fn set_my_name(&self, name: &str, lang_code: &str) -> Result<bool, ProfileError>;

    /// Returns the description shown in an empty chat with the bot.
    async fn get_my_description(&self, lang_code: &str) -> Result<String, ProfileError>;

    /// Sets the description (at most 512 characters).
    async fn set_my_description(
        &self,
        description: &str,
        lang_code: &str,
    ) -> Result<bool, ProfileError>;

    /// Returns the short description shown on the bot's profile page.
    async fn get_my_short_description(&self, lang_code: &str) -> Result<String, ProfileError>;

    /// Sets the short description (at most 120 characters).
    async fn set_my_short_description(
        &self,
        short_description: &str,
        lang_code: &str,
    ) -> Result<bool, ProfileError>;

    /// Reads the given field.
    async fn get_field(&self, field: ProfileField, lang_code: &str) -> Result<String, ProfileError> {
        match field {
            ProfileField::Name => self.get_my_name(lang_code).await,
            ProfileField::Description => self.get_my_description(lang_code).await,
            ProfileField::ShortDescription => self.get_my_short_description(lang_code).await,
        }
    }

    /// Writes the given field.
    async fn set_field(
        &self,
        field: ProfileField,
        value: &str,
        lang_code: &str,
    ) -> Result<bool, ProfileError> {
        match field {
            ProfileField::Name => self.set_my_name(value, lang_code).await,
            ProfileField::Description => self.set_my_description(value, lang_code).await,
            ProfileField::ShortDescription => {
                self.set_my_short_description(value, lang_code).await
            }
        }
    }
}
