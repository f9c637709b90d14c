//! Command handling module.
//!
//! Parses the six profile commands (`/getmyname`, `/setmyname`, ...)
//! and turns them into profile calls and Markdown replies.

mod handler;
mod replies;
mod types;

pub use handler::CommandHandler;
pub use types::{BotCommand, CommandInvocation, CommandResult};
