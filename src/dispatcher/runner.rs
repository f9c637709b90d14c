//! Update dispatcher runner.
//!
//! For every incoming message the dispatcher:
//! 1. Ignores outgoing messages and text that is not one of our commands
//! 2. Drops commands from senders outside `OWNER_IDS` (when configured)
//! 3. Spawns a task that fetches the replied-to text (setters without
//!    arguments only), runs the handler, and sends the reply
//!
//! Command tasks are independent; a failing command never stops the loop.

use std::sync::Arc;

use grammers_client::client::UpdatesConfiguration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::commands::{CommandHandler, CommandInvocation};
use crate::config::BotSettings;
use crate::telegram::{Message, TelegramBot, TelegramError, Update};

/// Messages that can be sent to the dispatcher.
#[derive(Debug, Clone)]
pub enum DispatcherMessage {
    /// Stop the dispatcher.
    Shutdown,
}

/// Routes incoming commands to the [`CommandHandler`].
pub struct UpdateDispatcher {
    /// Telegram bot client.
    bot: Arc<TelegramBot>,

    /// Profile command handler.
    handler: Arc<CommandHandler<TelegramBot>>,

    /// Operator allowlist and other settings.
    settings: Arc<BotSettings>,

    /// The bot's username, for `/command@username`.
    username: Option<String>,
}

impl UpdateDispatcher {
    /// Creates a new dispatcher.
    #[must_use]
    pub fn new(
        bot: Arc<TelegramBot>,
        handler: Arc<CommandHandler<TelegramBot>>,
        settings: Arc<BotSettings>,
        username: Option<String>,
    ) -> Self {
        Self {
            bot,
            handler,
            settings,
            username,
        }
    }

    /// Runs the dispatch loop until a shutdown message arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if the update stream was already taken.
    pub async fn run(&self, mut rx: mpsc::Receiver<DispatcherMessage>) -> Result<(), TelegramError> {
        let updates = self
            .bot
            .take_updates()
            .await
            .ok_or_else(|| TelegramError::Connection("update stream already in use".to_owned()))?;

        let mut stream = self
            .bot
            .inner()
            .stream_updates(
                updates,
                UpdatesConfiguration {
                    catch_up: false,
                    ..Default::default()
                },
            )
            .await;

        info!("Update dispatcher started");

        loop {
            tokio::select! {
                msg = rx.recv() => {
                    match msg {
                        Some(DispatcherMessage::Shutdown) | None => {
                            info!("Dispatcher shutting down");
                            break;
                        }
                    }
                }
                update = stream.next() => {
                    match update {
                        Ok(Update::NewMessage(message)) if !message.outgoing() => {
                            self.dispatch(message);
                        }
                        Ok(_) => {}
                        Err(e) => {
                            error!("Failed to receive update: {}", e);
                        }
                    }
                }
            }
        }

        stream.sync_update_state().await;
        Ok(())
    }

    /// Spawns a task for the message if it carries one of our commands.
    fn dispatch(&self, message: Message) {
        let Some(invocation) = CommandInvocation::parse(message.text(), self.username.as_deref())
        else {
            return;
        };

        let sender_id = TelegramBot::sender_id(&message);
        if !self.settings.is_operator(sender_id) {
            warn!(
                "Ignoring {} from unauthorized sender {:?}",
                invocation.command, sender_id
            );
            return;
        }

        debug!("Dispatching {} from {:?}", invocation.command, sender_id);

        let bot = Arc::clone(&self.bot);
        let handler = Arc::clone(&self.handler);

        tokio::spawn(async move {
            let invocation = if invocation.wants_reply_text() {
                let text = bot.replied_text(&message).await;
                invocation.with_reply_to_text(text)
            } else {
                invocation
            };

            let Some(result) = handler.execute(&invocation).await else {
                return;
            };

            if let Err(e) = bot.reply(&message, &result.message).await {
                error!("Failed to reply to {}: {}", invocation.command, e);
            }
        });
    }
}

impl std::fmt::Debug for UpdateDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateDispatcher")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
