//! Botinfo - Main Entry Point
//!
//! A Telegram bot that lets its operators view and update the bot's own
//! name, description and short description with chat commands.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use dialoguer::Password;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use botinfo::commands::{BotCommand, CommandHandler};
use botinfo::config::{BotSettings, ProfileConfig, TelegramConfig};
use botinfo::dispatcher::{DispatcherMessage, UpdateDispatcher};
use botinfo::profile::{apply_profile, export_profile};
use botinfo::telegram::TelegramBot;

/// Telegram bot that manages its own profile.
#[derive(Parser, Debug)]
#[command(name = "botinfo")]
#[command(about = "View and update your Telegram bot's profile from chat")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Generate an example profile file and exit.
    #[arg(long)]
    generate_config: bool,

    /// Apply the profile in this JSON file and exit.
    #[arg(long, value_name = "FILE", conflicts_with = "export")]
    apply: Option<String>,

    /// Save the current profile to this JSON file and exit.
    #[arg(long, value_name = "FILE")]
    export: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    if args.generate_config {
        return generate_example_config();
    }

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    let tg_config = TelegramConfig::from_env()
        .context("Failed to load Telegram configuration from environment")?;

    let settings =
        BotSettings::from_env_with_defaults().context("Failed to load bot settings")?;

    let bot = TelegramBot::connect(&tg_config)
        .await
        .context("Failed to connect to Telegram")?;

    if !bot.is_authorized().await.context("Failed to check authorization")? {
        authenticate(&bot, &tg_config).await?;
    }

    let bot = Arc::new(bot);

    if let Some(path) = args.apply {
        let result = apply_from_file(&bot, &path, &settings.lang_code).await;
        bot.disconnect();
        return result;
    }

    if let Some(path) = args.export {
        let result = export_to_file(&bot, &path, &settings.lang_code).await;
        bot.disconnect();
        return result;
    }

    if settings.register_commands {
        match bot
            .set_bot_commands(&BotCommand::all_commands(), &settings.lang_code)
            .await
        {
            Ok(true) => info!("Command menu registered"),
            Ok(false) => warn!("Telegram refused the command menu"),
            Err(e) => warn!("Failed to register command menu: {}", e),
        }
    }

    let username = bot.username().await.unwrap_or_else(|e| {
        warn!("Could not fetch bot username: {}", e);
        None
    });

    let handler = Arc::new(CommandHandler::new(
        Arc::clone(&bot),
        settings.lang_code.clone(),
    ));

    if settings.owner_ids.is_empty() {
        warn!("OWNER_IDS is not set; anyone can change this bot's profile");
    } else {
        info!("Operators: {:?}", settings.owner_ids);
    }

    let dispatcher = UpdateDispatcher::new(
        Arc::clone(&bot),
        handler,
        Arc::new(settings),
        username,
    );

    let (dispatcher_tx, dispatcher_rx) = mpsc::channel::<DispatcherMessage>(1);

    let dispatcher_handle = tokio::spawn(async move { dispatcher.run(dispatcher_rx).await });

    info!("Bot is running. Use Ctrl+C to stop.");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;
    info!("Received Ctrl+C, shutting down...");

    let _ = dispatcher_tx.send(DispatcherMessage::Shutdown).await;
    match dispatcher_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Dispatcher stopped with error: {}", e),
        Err(e) => warn!("Dispatcher task failed: {}", e),
    }
    bot.disconnect();

    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Generates an example profile file.
fn generate_example_config() -> Result<()> {
    let example = ProfileConfig::example();
    example.save_to_file("profile.example.json")?;

    println!("✓ Example profile written to: profile.example.json");
    println!("\nTo use this bot:");
    println!("1. Create a .env file with TG_API_ID, TG_API_HASH and TG_BOT_TOKEN");
    println!("2. Optionally set OWNER_IDS to the user IDs allowed to edit the profile");
    println!("3. Run: botinfo");
    println!("4. Or apply a whole profile at once: botinfo --apply profile.example.json");

    Ok(())
}

/// Signs in with the configured bot token, prompting for one if needed.
async fn authenticate(bot: &TelegramBot, config: &TelegramConfig) -> Result<()> {
    info!("Authentication required");

    let token = match &config.bot_token {
        Some(token) => token.clone(),
        None => Password::new()
            .with_prompt("Enter the bot token from @BotFather")
            .interact()?,
    };

    bot.bot_sign_in(token.trim(), &config.api_hash)
        .await
        .context("Authentication failed")
}

/// Applies a profile file and reports each field.
async fn apply_from_file(bot: &TelegramBot, path: &str, lang_code: &str) -> Result<()> {
    let profile = ProfileConfig::load_from_file(path)
        .with_context(|| format!("Failed to load profile from {path}"))?;

    let report = apply_profile(bot, &profile, lang_code)
        .await
        .context("Profile validation failed")?;

    for field in &report.applied {
        println!("✓ Updated {field}");
    }
    for field in &report.refused {
        println!("✗ Telegram refused {field}");
    }
    for (field, e) in &report.failed {
        println!("✗ Failed to update {field}: {e}");
    }

    if !report.is_complete() {
        bail!(
            "{} of {} fields were not applied",
            report.refused.len() + report.failed.len(),
            profile.len()
        );
    }

    Ok(())
}

/// Writes the live profile to a file.
async fn export_to_file(bot: &TelegramBot, path: &str, lang_code: &str) -> Result<()> {
    let profile = export_profile(bot, lang_code)
        .await
        .context("Failed to read the bot profile")?;

    profile
        .save_to_file(path)
        .with_context(|| format!("Failed to write profile to {path}"))?;

    println!("✓ Profile written to: {path}");
    Ok(())
}
