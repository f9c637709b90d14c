//! Telegram client wrapper module.
//!
//! Provides high-level abstractions for interacting with Telegram as a
//! bot: sign-in, profile reads and writes, command menu, and replies.

mod client;

pub use client::{RawUpdatesReceiver, TelegramBot, TelegramError};
pub use grammers_client::update::Message;
pub use grammers_client::update::Update;
