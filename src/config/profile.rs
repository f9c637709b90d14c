//! Profile fields, the profile file format, and its validation.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, MAX_SHORT_DESCRIPTION_LENGTH};

/// One of the bot's editable profile fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    /// Display name.
    Name,
    /// Description shown in an empty chat with the bot.
    Description,
    /// Short description shown on the bot's profile page.
    ShortDescription,
}

impl ProfileField {
    /// All fields, in the order they are applied and reported.
    pub const ALL: [Self; 3] = [Self::Name, Self::Description, Self::ShortDescription];

    /// Returns the platform's maximum length for this field, in characters.
    #[must_use]
    pub const fn max_length(self) -> usize {
        match self {
            Self::Name => MAX_NAME_LENGTH,
            Self::Description => MAX_DESCRIPTION_LENGTH,
            Self::ShortDescription => MAX_SHORT_DESCRIPTION_LENGTH,
        }
    }

    /// Whether the text of a replied-to message may stand in for arguments.
    #[must_use]
    pub const fn accepts_reply_text(self) -> bool {
        !matches!(self, Self::Name)
    }

    /// Human readable field name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::ShortDescription => "short description",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors that can occur during profile validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Bot {field} exceeds maximum length: {length} > {max_length}")]
    TooLong {
        field: ProfileField,
        length: usize,
        max_length: usize,
    },

    #[error("Bot {field} is empty")]
    Empty { field: ProfileField },

    #[error("No profile fields configured")]
    NoFields,

    #[error("Failed to read profile file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse profile file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Checks a single field value against its platform limit.
///
/// # Errors
///
/// Returns [`ValidationError::Empty`] for blank values and
/// [`ValidationError::TooLong`] when the value has too many characters.
pub fn validate_field(field: ProfileField, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }

    let length = value.chars().count();
    let max_length = field.max_length();
    if length > max_length {
        return Err(ValidationError::TooLong {
            field,
            length,
            max_length,
        });
    }

    Ok(())
}

/// A bot profile as stored on disk.
///
/// Every field is optional; `--apply` only touches the fields present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileConfig {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,

    /// When this profile was exported from Telegram, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

impl ProfileConfig {
    /// Loads a profile from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Saves the profile to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ValidationError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the value configured for a field.
    #[must_use]
    pub fn get(&self, field: ProfileField) -> Option<&str> {
        match field {
            ProfileField::Name => self.name.as_deref(),
            ProfileField::Description => self.description.as_deref(),
            ProfileField::ShortDescription => self.short_description.as_deref(),
        }
    }

    /// Sets the value of a field.
    pub fn set(&mut self, field: ProfileField, value: String) {
        let slot = match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Description => &mut self.description,
            ProfileField::ShortDescription => &mut self.short_description,
        };
        *slot = Some(value);
    }

    /// Iterates over the fields that have a value, in application order.
    pub fn fields(&self) -> impl Iterator<Item = (ProfileField, &str)> {
        ProfileField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    /// Returns the number of configured fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields().count()
    }

    /// Checks if no field is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validates all configured fields.
    ///
    /// # Errors
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::NoFields);
        }

        for (field, value) in self.fields() {
            validate_field(field, value)?;
        }

        Ok(())
    }

    /// Returns detailed validation results for every configured field.
    #[must_use]
    pub fn validate_all(&self) -> Vec<(ProfileField, Result<(), ValidationError>)> {
        self.fields()
            .map(|(field, value)| (field, validate_field(field, value)))
            .collect()
    }

    /// Creates an example profile for users to reference.
    #[must_use]
    pub fn example() -> Self {
        Self {
            name: Some("Profile Helper".to_owned()),
            description: Some(
                "I keep this bot's profile up to date.\n\n\
                 Use /getmyname, /getmydescription or /getmyshortdescription to look around."
                    .to_owned(),
            ),
            short_description: Some("Manages its own profile".to_owned()),
            exported_at: None,
        }
    }
}
