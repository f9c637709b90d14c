//! Applying a profile file to Telegram and exporting the live profile.

use chrono::Utc;
use tracing::{error, info, warn};

use super::{ProfileClient, ProfileError, ProfileField};
use crate::config::{ProfileConfig, ValidationError};

/// Outcome of [`apply_profile`], per field.
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Fields Telegram accepted.
    pub applied: Vec<ProfileField>,

    /// Fields Telegram answered with a `false` result.
    pub refused: Vec<ProfileField>,

    /// Fields whose request failed.
    pub failed: Vec<(ProfileField, ProfileError)>,
}

impl ApplyReport {
    /// Checks if every configured field was applied.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.refused.is_empty() && self.failed.is_empty()
    }
}

/// Sets every field present in `profile`.
///
/// The whole profile is validated before the first request, so an
/// invalid file changes nothing. A failing field does not stop the
/// remaining ones.
///
/// # Errors
///
/// Returns the first validation error if the profile is invalid.
pub async fn apply_profile<C>(
    client: &C,
    profile: &ProfileConfig,
    lang_code: &str,
) -> Result<ApplyReport, ValidationError>
where
    C: ProfileClient + ?Sized,
{
    profile.validate()?;

    let mut report = ApplyReport::default();

    for (field, value) in profile.fields() {
        match client.set_field(field, value.trim(), lang_code).await {
            Ok(true) => {
                info!("Applied bot {}", field);
                report.applied.push(field);
            }
            Ok(false) => {
                warn!("Telegram refused to update bot {}", field);
                report.refused.push(field);
            }
            Err(e) => {
                error!("Failed to update bot {}: {}", field, e);
                report.failed.push((field, e));
            }
        }
    }

    Ok(report)
}

/// Reads the live profile into a [`ProfileConfig`].
///
/// # Errors
///
/// Returns the first error reported by the client.
pub async fn export_profile<C>(client: &C, lang_code: &str) -> Result<ProfileConfig, ProfileError>
where
    C: ProfileClient + ?Sized,
{
    let mut profile = ProfileConfig::default();

    for field in ProfileField::ALL {
        let value = client.get_field(field, lang_code).await?;
        profile.set(field, value);
    }

    profile.exported_at = Some(Utc::now());
    Ok(profile)
}
