//! Telegram client wrapper for bot profile management.

use std::sync::Arc;

use async_trait::async_trait;
use grammers_client::update::Message;
use grammers_client::message::InputMessage;
use grammers_client::{Client, InvocationError, SenderPool, sender};
use grammers_session::storages::SqliteSession;
use grammers_session::updates::UpdatesLike;
use grammers_tl_types as tl;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::TelegramConfig;
use crate::profile::{ProfileClient, ProfileError, ProfileField};

/// Raw update channel produced by the sender pool.
pub type RawUpdatesReceiver = mpsc::UnboundedReceiver<UpdatesLike>;

/// Errors that can occur during Telegram operations.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Not authorized. Please sign in first.")]
    NotAuthorized,

    #[error("Sign in failed: {0}")]
    SignInFailed(String),

    #[error("Flood wait required: {0} seconds")]
    FloodWait(u32),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("API invocation error: {0}")]
    Invocation(String),
}

impl From<InvocationError> for TelegramError {
    fn from(err: InvocationError) -> Self {
        let err_str = err.to_string();

        if !matches!(err, InvocationError::Rpc(_)) {
            return Self::Connection(err_str);
        }

        classify_rpc_error(err_str)
    }
}

/// RPC errors meaning the session no longer has a valid login.
const UNAUTHORIZED_ERRORS: [&str; 4] = [
    "AUTH_KEY_UNREGISTERED",
    "SESSION_REVOKED",
    "SESSION_EXPIRED",
    "USER_DEACTIVATED",
];

/// Maps the text of an RPC error to the matching [`TelegramError`].
fn classify_rpc_error(err_str: String) -> TelegramError {
    if (err_str.contains("FLOOD_WAIT") || err_str.contains("flood"))
        && let Some(seconds) = extract_flood_wait_seconds(&err_str)
    {
        return TelegramError::FloodWait(seconds);
    }

    if err_str.contains("rpc error 401")
        || UNAUTHORIZED_ERRORS.iter().any(|name| err_str.contains(name))
    {
        return TelegramError::NotAuthorized;
    }

    TelegramError::Invocation(err_str)
}

/// Extracts flood wait seconds from an error message.
fn extract_flood_wait_seconds(err_msg: &str) -> Option<u32> {
    let patterns = ["FLOOD_WAIT_", "flood wait "];
    let lower = err_msg.to_lowercase();

    for pattern in patterns {
        if let Some(idx) = lower.find(&pattern.to_lowercase()) {
            let start = idx + pattern.len();
            let num_str: String = lower[start..]
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            if let Ok(seconds) = num_str.parse() {
                return Some(seconds);
            }
        }
    }
    None
}

/// The three profile strings as returned by `bots.getBotInfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct BotInfo {
    name: String,
    about: String,
    description: String,
}

impl BotInfo {
    fn field(self, field: ProfileField) -> String {
        match field {
            ProfileField::Name => self.name,
            ProfileField::Description => self.description,
            ProfileField::ShortDescription => self.about,
        }
    }
}

/// Builds a `bots.setBotInfo` request touching a single field.
///
/// `about` is what Telegram calls the short description.
fn set_bot_info_request(
    field: ProfileField,
    value: &str,
    lang_code: &str,
) -> tl::functions::bots::SetBotInfo {
    let mut request = tl::functions::bots::SetBotInfo {
        bot: None,
        lang_code: lang_code.to_owned(),
        name: None,
        about: None,
        description: None,
    };

    let slot = match field {
        ProfileField::Name => &mut request.name,
        ProfileField::Description => &mut request.description,
        ProfileField::ShortDescription => &mut request.about,
    };
    *slot = Some(value.to_owned());

    request
}

/// High-level Telegram bot client wrapper.
pub struct TelegramBot {
    /// The underlying grammers client.
    client: Client,

    /// Handle to the sender pool for disconnection.
    handle: sender::SenderPoolHandle,

    /// Raw updates, until the dispatcher takes them.
    updates: Mutex<Option<RawUpdatesReceiver>>,

    /// Background task running the sender pool.
    _pool_task: JoinHandle<()>,
}

impl TelegramBot {
    /// Connects to Telegram with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be opened or the connection fails.
    pub async fn connect(config: &TelegramConfig) -> Result<Self, TelegramError> {
        info!("Connecting to Telegram...");

        let session = Arc::new(
            SqliteSession::open(&config.session_path)
                .await
                .map_err(|e| TelegramError::Session(e.to_string()))?,
        );

        let SenderPool {
            runner,
            updates,
            handle,
        } = SenderPool::new(Arc::clone(&session), config.api_id);

        let client = Client::new(handle.clone());

        let pool_task = tokio::spawn(async move {
            runner.run().await;
        });

        let is_authorized = client
            .is_authorized()
            .await
            .map_err(|e| TelegramError::Connection(e.to_string()))?;

        info!("Connected to Telegram. Authorized: {}", is_authorized);

        Ok(Self {
            client,
            handle: handle.thin,
            updates: Mutex::new(Some(updates)),
            _pool_task: pool_task,
        })
    }

    /// Checks if the client is authorized.
    ///
    /// # Errors
    ///
    /// Returns an error if the check fails.
    pub async fn is_authorized(&self) -> Result<bool, TelegramError> {
        self.client
            .is_authorized()
            .await
            .map_err(|e| TelegramError::Connection(e.to_string()))
    }

    /// Signs in as a bot with a token from `@BotFather`.
    ///
    /// # Errors
    ///
    /// Returns an error if Telegram rejects the token.
    pub async fn bot_sign_in(&self, token: &str, api_hash: &str) -> Result<(), TelegramError> {
        info!("Signing in with bot token {}...", mask_token(token));

        let user = self
            .client
            .bot_sign_in(token, api_hash)
            .await
            .map_err(|e| TelegramError::SignInFailed(e.to_string()))?;

        info!(
            "Signed in as @{}",
            user.username().unwrap_or("<no username>")
        );
        Ok(())
    }

    /// Returns the bot's own username, used to match `/command@username`.
    ///
    /// # Errors
    ///
    /// Returns an error if the account cannot be fetched.
    pub async fn username(&self) -> Result<Option<String>, TelegramError> {
        let me = self.client.get_me().await?;
        Ok(me.username().map(str::to_owned))
    }

    /// Publishes the command menu shown to users.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn set_bot_commands(
        &self,
        commands: &[(&str, &str)],
        lang_code: &str,
    ) -> Result<bool, TelegramError> {
        let request = tl::functions::bots::SetBotCommands {
            scope: tl::enums::BotCommandScope::Default,
            lang_code: lang_code.to_owned(),
            commands: commands
                .iter()
                .map(|(command, description)| {
                    tl::enums::BotCommand::Command(tl::types::BotCommand {
                        command: (*command).to_owned(),
                        description: (*description).to_owned(),
                    })
                })
                .collect(),
        };

        let ok = self.client.invoke(&request).await?;
        debug!("Registered {} commands: {}", commands.len(), ok);
        Ok(ok)
    }

    /// Takes the raw update channel. Returns `None` after the first call.
    pub async fn take_updates(&self) -> Option<RawUpdatesReceiver> {
        self.updates.lock().await.take()
    }

    /// Replies to a message with Markdown text.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be sent.
    pub async fn reply(&self, message: &Message, markdown: &str) -> Result<(), TelegramError> {
        message
            .reply(InputMessage::new().markdown(markdown))
            .await?;
        Ok(())
    }

    /// Returns the text of the message `message` replies to, if any.
    ///
    /// Lookup failures are logged and treated as "no reply".
    pub async fn replied_text(&self, message: &Message) -> Option<String> {
        match message.get_reply().await {
            Ok(Some(replied)) => {
                let text = replied.text();
                (!text.is_empty()).then(|| text.to_owned())
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to fetch replied-to message: {}", e);
                None
            }
        }
    }

    /// Returns the user ID of the message sender, if it has one.
    #[must_use]
    pub fn sender_id(message: &Message) -> Option<i64> {
        message.sender().map(|sender| sender.id().bare_id())
    }

    /// Returns a reference to the underlying client for advanced operations.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Disconnects from Telegram.
    pub fn disconnect(&self) {
        info!("Disconnecting from Telegram...");
        self.handle.quit();
    }

    async fn get_bot_info(&self, lang_code: &str) -> Result<BotInfo, TelegramError> {
        let request = tl::functions::bots::GetBotInfo {
            bot: None,
            lang_code: lang_code.to_owned(),
        };

        let tl::enums::bots::BotInfo::Info(info) = self.client.invoke(&request).await?;
        Ok(BotInfo {
            name: info.name,
            about: info.about,
            description: info.description,
        })
    }

    async fn set_bot_info(
        &self,
        field: ProfileField,
        value: &str,
        lang_code: &str,
    ) -> Result<bool, TelegramError> {
        info!(
            "Updating bot {} to: \"{}\"",
            field,
            truncate_for_log(value, 30)
        );

        match self
            .client
            .invoke(&set_bot_info_request(field, value, lang_code))
            .await
        {
            Ok(ok) => Ok(ok),
            Err(e) => {
                let err: TelegramError = e.into();
                if let TelegramError::FloodWait(seconds) = &err {
                    warn!("Flood wait triggered: {} seconds", seconds);
                }
                Err(err)
            }
        }
    }
}

#[async_trait]
impl ProfileClient for TelegramBot {
    async fn get_my_name(&self, lang_code: &str) -> Result<String, ProfileError> {
        self.get_bot_info(lang_code)
            .await
            .map(|info| info.field(ProfileField::Name))
            .map_err(ProfileError::from)
    }

    async fn set_my_name(&self, name: &str, lang_code: &str) -> Result<bool, ProfileError> {
        self.set_bot_info(ProfileField::Name, name, lang_code)
            .await
            .map_err(ProfileError::from)
    }

    async fn get_my_description(&self, lang_code: &str) -> Result<String, ProfileError> {
        self.get_bot_info(lang_code)
            .await
            .map(|info| info.field(ProfileField::Description))
            .map_err(ProfileError::from)
    }

    async fn set_my_description(
        &self,
        description: &str,
        lang_code: &str,
    ) -> Result<bool, ProfileError> {
        self.set_bot_info(ProfileField::Description, description, lang_code)
            .await
            .map_err(ProfileError::from)
    }

    async fn get_my_short_description(&self, lang_code: &str) -> Result<String, ProfileError> {
        self.get_bot_info(lang_code)
            .await
            .map(|info| info.field(ProfileField::ShortDescription))
            .map_err(ProfileError::from)
    }

    async fn set_my_short_description(
        &self,
        short_description: &str,
        lang_code: &str,
    ) -> Result<bool, ProfileError> {
        self.set_bot_info(ProfileField::ShortDescription, short_description, lang_code)
            .await
            .map_err(ProfileError::from)
    }
}

impl std::fmt::Debug for TelegramBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramBot").finish_non_exhaustive()
    }
}

/// Masks a bot token for logging (keeps the bot ID before the colon).
fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((bot_id, _)) if !bot_id.is_empty() => format!("{bot_id}:***"),
        _ => "***".to_owned(),
    }
}

/// Truncates a string for logging purposes.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_owned()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}
