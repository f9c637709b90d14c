//! Bot profile access.
//!
//! Defines the seam between command handling and the Telegram client:
//! handlers only see [`ProfileClient`], so tests can substitute a mock.

mod client;
mod sync;

#[cfg(test)]
pub(crate) mod mock;

pub use crate::config::ProfileField;
pub use client::{ProfileClient, ProfileError};
pub use sync::{ApplyReport, apply_profile, export_profile};
