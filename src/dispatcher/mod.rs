//! Update dispatching module.
//!
//! Reads incoming messages and routes profile commands to the
//! command handler, one task per command.

mod runner;

pub use runner::{DispatcherMessage, UpdateDispatcher};
