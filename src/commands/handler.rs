//! Command handler implementation.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::replies;
use super::types::{BotCommand, CommandInvocation, CommandResult};
use crate::config::{ProfileField, ValidationError, validate_field};
use crate::profile::{ProfileClient, ProfileError};

/// Runs profile commands against a [`ProfileClient`].
pub struct CommandHandler<C: ?Sized> {
    /// Remote profile client.
    client: Arc<C>,

    /// Language code passed with every profile call.
    lang_code: String,
}

impl<C> CommandHandler<C>
where
    C: ProfileClient + ?Sized,
{
    /// Creates a new command handler.
    #[must_use]
    pub fn new(client: Arc<C>, lang_code: String) -> Self {
        Self { client, lang_code }
    }

    /// Executes a parsed command.
    ///
    /// Returns `None` when no reply should be sent; getters stay silent
    /// when Telegram fails.
    pub async fn execute(&self, invocation: &CommandInvocation) -> Option<CommandResult> {
        debug!("Handling command: {}", invocation.command);

        let result = match invocation.command {
            BotCommand::Get(field) => self.handle_get(field).await,
            BotCommand::Set(field) => Some(self.handle_set(field, invocation).await),
        };

        if let Some(result) = &result {
            info!(
                "Command {} finished: success={}",
                invocation.command, result.success
            );
        }

        result
    }

    async fn handle_get(&self, field: ProfileField) -> Option<CommandResult> {
        match self.client.get_field(field, &self.lang_code).await {
            Ok(value) => Some(CommandResult::success(replies::current(field, &value))),
            Err(e) => {
                error!("Error getting bot {}: {}", field, e);
                None
            }
        }
    }

    async fn handle_set(&self, field: ProfileField, invocation: &CommandInvocation) -> CommandResult {
        let Some(value) = resolve_input(field, invocation) else {
            return CommandResult::error(replies::missing_input(field));
        };

        match validate_field(field, &value) {
            Ok(()) => {}
            Err(ValidationError::TooLong { length, .. }) => {
                debug!("Rejected bot {}: {} chars", field, length);
                return CommandResult::error(replies::too_long(field));
            }
            Err(_) => return CommandResult::error(replies::missing_input(field)),
        }

        match self.client.set_field(field, &value, &self.lang_code).await {
            Ok(true) => {
                info!("Bot {} updated", field);
                CommandResult::success(replies::updated(field, &value))
            }
            Ok(false) => {
                warn!("Telegram refused to update bot {}", field);
                CommandResult::error(replies::refused(field))
            }
            Err(ProfileError::Telegram(e)) => {
                error!("TelegramError while setting bot {}: {}", field, e);
                CommandResult::error(replies::api_error(field))
            }
            Err(e @ ProfileError::Unexpected(_)) => {
                error!("Unexpected error while setting bot {}: {}", field, e);
                CommandResult::error(replies::unexpected_error(field))
            }
        }
    }
}

/// Picks the new value for a setter.
///
/// Arguments win; otherwise fields that allow it fall back to the text
/// of the replied-to message. Blank input yields `None`.
fn resolve_input(field: ProfileField, invocation: &CommandInvocation) -> Option<String> {
    let raw = if invocation.args.is_empty() {
        if !field.accepts_reply_text() {
            return None;
        }
        invocation.reply_to_text.as_deref()?.trim().to_owned()
    } else {
        invocation.args.join(" ").trim().to_owned()
    };

    (!raw.is_empty()).then_some(raw)
}

impl<C: ?Sized> std::fmt::Debug for CommandHandler<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHandler")
            .field("lang_code", &self.lang_code)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::mock::{MockFailure, MockProfileClient};

    fn handler(client: MockProfileClient) -> (CommandHandler<MockProfileClient>, Arc<MockProfileClient>) {
        let client = Arc::new(client);
        (CommandHandler::new(Arc::clone(&client), String::new()), client)
    }

    fn invocation(command: BotCommand, args: &[&str]) -> CommandInvocation {
        CommandInvocation::new(command, args.iter().map(|a| (*a).to_owned()).collect())
    }

    const SET_NAME: BotCommand = BotCommand::Set(ProfileField::Name);
    const SET_DESC: BotCommand = BotCommand::Set(ProfileField::Description);
    const SET_SHORT: BotCommand = BotCommand::Set(ProfileField::ShortDescription);

    #[tokio::test]
    async fn test_get_name() {
        let (handler, _) = handler(MockProfileClient::new().with_value(ProfileField::Name, "Helper"));
        let result = handler
            .execute(&invocation(BotCommand::Get(ProfileField::Name), &[]))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.message, "**📝 Current Bot Name:**\n`Helper`");
    }

    #[tokio::test]
    async fn test_getters_stay_silent_on_error() {
        for failure in [
            MockFailure::Telegram,
            MockFailure::Disconnected,
            MockFailure::Unexpected,
        ] {
            let (handler, client) = handler(MockProfileClient::new().failing(failure));
            for field in ProfileField::ALL {
                let result = handler.execute(&invocation(BotCommand::Get(field), &[])).await;
                assert!(result.is_none());
            }
            assert_eq!(client.calls().len(), 3);
        }
    }

    #[tokio::test]
    async fn test_set_name_joins_and_trims_args() {
        let (handler, client) = handler(MockProfileClient::new());
        let result = handler
            .execute(&invocation(SET_NAME, &["Shiny", "New", "Bot"]))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(
            result.message,
            "✅ **Bot name updated successfully to:**\n`Shiny New Bot`"
        );
        assert_eq!(
            client.set_calls(),
            vec![(ProfileField::Name, "Shiny New Bot".to_owned())]
        );
    }

    #[tokio::test]
    async fn test_set_name_too_long_is_rejected_locally() {
        let (handler, client) = handler(MockProfileClient::new());
        let long_name = "a".repeat(65);
        let result = handler
            .execute(&invocation(SET_NAME, &[long_name.as_str()]))
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.message.contains("64"));
        assert!(result.message.contains("too long"));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_set_name_at_limit_is_accepted() {
        let (handler, client) = handler(MockProfileClient::new());
        let name = "ü".repeat(64);
        let result = handler.execute(&invocation(SET_NAME, &[name.as_str()])).await.unwrap();

        assert!(result.success);
        assert_eq!(client.set_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_set_name_ignores_reply_text() {
        let (handler, client) = handler(MockProfileClient::new());
        let inv = invocation(SET_NAME, &[]).with_reply_to_text(Some("From reply".to_owned()));
        let result = handler.execute(&inv).await.unwrap();

        assert!(!result.success);
        assert_eq!(result.message, "❌ _Please provide a new bot name!_");
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_set_without_input_prompts() {
        let (handler, client) = handler(MockProfileClient::new());
        for command in [SET_NAME, SET_DESC, SET_SHORT] {
            let result = handler.execute(&invocation(command, &[])).await.unwrap();
            assert!(!result.success);
            assert!(result.message.starts_with("❌ _Please provide"));
        }
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_set_with_blank_reply_text_prompts() {
        let (handler, client) = handler(MockProfileClient::new());
        let inv = invocation(SET_DESC, &[]).with_reply_to_text(Some(" \n\t ".to_owned()));
        let result = handler.execute(&inv).await.unwrap();

        assert!(!result.success);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_set_description_from_reply_text() {
        let (handler, client) = handler(MockProfileClient::new());
        let inv = invocation(SET_DESC, &[])
            .with_reply_to_text(Some("  Line one\n*Line two*  ".to_owned()));
        let result = handler.execute(&inv).await.unwrap();

        assert!(result.success);
        assert_eq!(
            result.message,
            "✅ **Bot description updated!**\n```\nLine one\n*Line two*\n```"
        );
        assert_eq!(
            client.value(ProfileField::Description).as_deref(),
            Some("Line one\n*Line two*")
        );
    }

    #[tokio::test]
    async fn test_args_take_precedence_over_reply_text() {
        let (handler, client) = handler(MockProfileClient::new());
        let inv = invocation(SET_SHORT, &["From", "args"])
            .with_reply_to_text(Some("From reply".to_owned()));
        handler.execute(&inv).await.unwrap();

        assert_eq!(
            client.set_calls(),
            vec![(ProfileField::ShortDescription, "From args".to_owned())]
        );
    }

    #[tokio::test]
    async fn test_set_description_too_long() {
        let (handler, client) = handler(MockProfileClient::new());
        let inv = invocation(SET_DESC, &[]).with_reply_to_text(Some("d".repeat(513)));
        let result = handler.execute(&inv).await.unwrap();

        assert!(!result.success);
        assert!(result.message.contains("512"));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_set_short_description_too_long() {
        let (handler, client) = handler(MockProfileClient::new());
        let text = "s".repeat(121);
        let result = handler.execute(&invocation(SET_SHORT, &[text.as_str()])).await.unwrap();

        assert!(!result.success);
        assert!(result.message.contains("120"));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_short_description_echo_is_sanitized() {
        let (handler, client) = handler(MockProfileClient::new());
        let result = handler
            .execute(&invocation(SET_SHORT, &["Use", "`code`", "and", "*stars*"]))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(
            result.message,
            "✅ **Short description updated!**\n`Use 'code' and stars`"
        );
        assert_eq!(
            client.value(ProfileField::ShortDescription).as_deref(),
            Some("Use `code` and *stars*")
        );
    }

    #[tokio::test]
    async fn test_set_refused_by_telegram() {
        let (handler, _) = handler(MockProfileClient::new().refusing());
        let result = handler.execute(&invocation(SET_NAME, &["Bot"])).await.unwrap();

        assert!(!result.success);
        assert_eq!(result.message, "⚠️ _Failed to update bot name. Try again later._");
    }

    #[tokio::test]
    async fn test_set_api_error_is_reported() {
        let (handler, client) = handler(MockProfileClient::new().failing(MockFailure::Telegram));
        let result = handler.execute(&invocation(SET_DESC, &["About"])).await.unwrap();

        assert!(!result.success);
        assert_eq!(
            result.message,
            "🚫 _Telegram API Error while updating the description._"
        );
        assert_eq!(client.set_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_set_connection_failure_is_an_api_error() {
        let (handler, _) = handler(MockProfileClient::new().failing(MockFailure::Disconnected));
        let result = handler.execute(&invocation(SET_NAME, &["Bot"])).await.unwrap();

        assert!(!result.success);
        assert_eq!(
            result.message,
            "🚫 _Telegram API Error occurred while updating the name._"
        );
    }

    #[tokio::test]
    async fn test_set_unexpected_error_is_reported() {
        let (handler, _) = handler(MockProfileClient::new().failing(MockFailure::Unexpected));
        let result = handler.execute(&invocation(SET_NAME, &["Bot"])).await.unwrap();

        assert!(!result.success);
        assert_eq!(
            result.message,
            "🚫 _An unexpected error occurred while setting the name._"
        );
    }

    #[tokio::test]
    async fn test_lang_code_is_forwarded() {
        let client = Arc::new(MockProfileClient::new());
        let handler = CommandHandler::new(Arc::clone(&client), "de".to_owned());
        handler.execute(&invocation(SET_NAME, &["Bot"])).await;
        handler
            .execute(&invocation(BotCommand::Get(ProfileField::Name), &[]))
            .await;

        assert!(client.calls().iter().all(|c| c.lang_code == "de"));
    }

    #[tokio::test]
    async fn test_works_behind_trait_object() {
        let client: Arc<dyn ProfileClient> =
            Arc::new(MockProfileClient::new().with_value(ProfileField::ShortDescription, "Hey"));
        let handler = CommandHandler::new(client, String::new());
        let result = handler
            .execute(&invocation(BotCommand::Get(ProfileField::ShortDescription), &[]))
            .await
            .unwrap();
        assert_eq!(result.message, "**📝 My Short Description:**\n```\nHey\n```");
    }
}
