//! Bot initialization and command registration
//!
//! This module contains:
//! - Command enum definition (no-argument commands)
//! - Bot instance creation
//! - Telegram-side command list registration
//!
//! Commands that take an argument (/set, /pilih, /hapus, /c) are routed by
//! prefix-filtered handlers in the schema instead of the derive, so a bare
//! `/set` can get a usage reply rather than falling through to the row
//! classifier.

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config;

/// No-argument bot commands with descriptions
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "I can:")]
pub enum Command {
    #[command(description = "show usage help")]
    Start,
    #[command(description = "show usage help")]
    Help,
    #[command(description = "create a new spreadsheet and make it active")]
    New,
    #[command(description = "list your spreadsheets")]
    List,
    #[command(description = "send the active spreadsheet as a file")]
    Get,
}

/// Creates a Bot instance from the configured token
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - BOT_TOKEN missing or client construction failed
pub fn create_bot() -> anyhow::Result<Bot> {
    let token = config::BOT_TOKEN
        .clone()
        .ok_or_else(|| anyhow::anyhow!("BOT_TOKEN environment variable not set"))?;

    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    Ok(Bot::with_client(token, client))
}

/// Sets up the bot command list in the Telegram UI
///
/// # Arguments
/// * `bot` - Bot instance to configure
///
/// # Returns
/// * `Ok(())` - Commands set successfully
/// * `Err(RequestError)` - Failed to set commands
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    use teloxide::types::BotCommand;

    bot.set_my_commands(vec![
        BotCommand::new("start", "show usage help"),
        BotCommand::new("help", "show usage help"),
        BotCommand::new("set", "set the default password"),
        BotCommand::new("new", "create a new spreadsheet and make it active"),
        BotCommand::new("list", "list your spreadsheets"),
        BotCommand::new("pilih", "select the active spreadsheet"),
        BotCommand::new("hapus", "delete a spreadsheet"),
        BotCommand::new("get", "send the active spreadsheet as a file"),
        BotCommand::new("c", "toggle manual cookie mode"),
    ])
    .await?;

    Ok(())
}
