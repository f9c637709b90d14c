//! Botinfo Library
//!
//! A Telegram bot that manages its own profile.
//!
//! This crate provides the core functionality for:
//! - Viewing and updating the bot's name, description and short description
//!   with chat commands
//! - Validating profile values against Telegram's length limits
//! - Applying and exporting profile files
//! - Connecting to Telegram via `MTProto` and dispatching commands

pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod profile;
pub mod telegram;
