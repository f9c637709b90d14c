//! Command types and definitions.

use std::fmt;

use crate::config::ProfileField;

/// Available bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    /// Show the current value of a profile field.
    Get(ProfileField),

    /// Update a profile field.
    Set(ProfileField),
}

impl BotCommand {
    /// Every command the bot answers to, in help order.
    pub const ALL: [Self; 6] = [
        Self::Get(ProfileField::Name),
        Self::Set(ProfileField::Name),
        Self::Get(ProfileField::Description),
        Self::Set(ProfileField::Description),
        Self::Get(ProfileField::ShortDescription),
        Self::Set(ProfileField::ShortDescription),
    ];

    /// Looks up a command by its name (without the leading slash).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL.into_iter().find(|cmd| cmd.name() == name)
    }

    /// Returns the command name as registered with Telegram.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Get(ProfileField::Name) => "getmyname",
            Self::Set(ProfileField::Name) => "setmyname",
            Self::Get(ProfileField::Description) => "getmydescription",
            Self::Set(ProfileField::Description) => "setmydescription",
            Self::Get(ProfileField::ShortDescription) => "getmyshortdescription",
            Self::Set(ProfileField::ShortDescription) => "setmyshortdescription",
        }
    }

    /// Returns the command description for the command menu.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Get(ProfileField::Name) => "Show the bot's current name",
            Self::Set(ProfileField::Name) => "Change the bot's name",
            Self::Get(ProfileField::Description) => "Show the bot's description",
            Self::Set(ProfileField::Description) => "Change the bot's description",
            Self::Get(ProfileField::ShortDescription) => "Show the bot's short description",
            Self::Set(ProfileField::ShortDescription) => "Change the bot's short description",
        }
    }

    /// Returns all available commands as `(name, description)` pairs.
    #[must_use]
    pub fn all_commands() -> Vec<(&'static str, &'static str)> {
        Self::ALL
            .iter()
            .map(|cmd| (cmd.name(), cmd.description()))
            .collect()
    }
}

impl fmt::Display for BotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name())
    }
}

/// A single command as sent by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// The parsed command.
    pub command: BotCommand,

    /// Whitespace-separated argument tokens.
    pub args: Vec<String>,

    /// Text of the message the command replied to, if any.
    pub reply_to_text: Option<String>,
}

impl CommandInvocation {
    /// Creates an invocation without reply-to text.
    #[must_use]
    pub fn new(command: BotCommand, args: Vec<String>) -> Self {
        Self {
            command,
            args,
            reply_to_text: None,
        }
    }

    /// Attaches the text of the replied-to message.
    #[must_use]
    pub fn with_reply_to_text(mut self, text: Option<String>) -> Self {
        self.reply_to_text = text;
        self
    }

    /// Parses a command from a message text.
    ///
    /// Accepts `/name args` and `/name@bot_username args`. When a mention is
    /// present and `bot_username` is known, it must match (ignoring case).
    /// Returns `None` if the message is not one of the bot's commands.
    #[must_use]
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let text = text.trim();
        let rest = text.strip_prefix('/')?;
        if rest.starts_with(char::is_whitespace) {
            return None;
        }

        let mut tokens = rest.split_whitespace();
        let head = tokens.next()?;

        let name = match head.split_once('@') {
            Some((name, mention)) => {
                if let Some(username) = bot_username
                    && !mention.eq_ignore_ascii_case(username.trim_start_matches('@'))
                {
                    return None;
                }
                name
            }
            None => head,
        };

        let command = BotCommand::from_name(name)?;
        let args = tokens.map(str::to_owned).collect();

        Some(Self::new(command, args))
    }

    /// Whether the handler will look at the replied-to message.
    ///
    /// Lets the caller skip fetching it for every other command.
    #[must_use]
    pub fn wants_reply_text(&self) -> bool {
        matches!(self.command, BotCommand::Set(field) if field.accepts_reply_text())
            && self.args.is_empty()
    }
}

/// Result of command execution.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Whether the command was successful.
    pub success: bool,

    /// Response message to show the user (Markdown).
    pub message: String,
}

impl CommandResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Creates an error result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
