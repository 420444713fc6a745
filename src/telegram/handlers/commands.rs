//! Command endpoint implementations

use teloxide::prelude::*;
use teloxide::types::InputFile;

use super::types::{sender_id, HandlerDeps, HandlerError};

/// Usage text sent for /start and /help
pub const HELP_TEXT: &str = "\
📖 HELP

/start
➜ Show this help

/set <password>
➜ Set the default password

/new
➜ Create a new spreadsheet

/list
➜ List your spreadsheets

/pilih <name.xlsx>
➜ Select the active spreadsheet

/hapus <name.xlsx>
➜ Delete a spreadsheet

/get
➜ Send the active spreadsheet

/c
➜ Manual cookie mode (STAYS ON)
/c off
➜ Turn manual cookie mode off

INPUT FORMATS:
1) id|mail|code
2) id|pw|mail|code
3) Facebook paste (3 lines):
   fb link (id=...)
   email
   code
4) Cookie paste (auto):
   cookies (contains c_user)

COLUMNS:
A = ID / Cookies(manual)
B = Password
C = Mail / Cookies(auto)
D = Code";

pub async fn handle_help_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, HELP_TEXT).await?;
    Ok(())
}

/// /set <password> - store the default password, overwriting any previous one
pub async fn handle_set_command(bot: &Bot, msg: &Message, deps: &HandlerDeps, arg: Option<&str>) -> Result<(), HandlerError> {
    let Some(user) = sender_id(msg) else {
        return Ok(());
    };
    let Some(password) = arg else {
        bot.send_message(msg.chat.id, "❌ Usage: /set <password>").await?;
        return Ok(());
    };
    deps.store.set_password(user, password)?;
    bot.send_message(msg.chat.id, "✅ Password set").await?;
    Ok(())
}

/// /new - create the next sequential sheet and make it active
pub async fn handle_new_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let Some(user) = sender_id(msg) else {
        return Ok(());
    };
    let name = deps.sheets.create_sheet(deps.store.as_ref(), user)?;
    bot.send_message(msg.chat.id, format!("🆕 Active spreadsheet: {}", name))
        .await?;
    Ok(())
}

/// /list - enumerate the user's sheet files
pub async fn handle_list_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let Some(user) = sender_id(msg) else {
        return Ok(());
    };
    let sheets = deps.store.list_sheets(user)?;
    let listing = if sheets.is_empty() {
        "- empty".to_string()
    } else {
        sheets.join("\n")
    };
    bot.send_message(msg.chat.id, format!("📂 YOUR SPREADSHEETS:\n{}", listing))
        .await?;
    Ok(())
}

/// /pilih <name> - activate an existing sheet; unknown names are rejected
pub async fn handle_select_command(
    bot: &Bot,
    msg: &Message,
    deps: &HandlerDeps,
    arg: Option<&str>,
) -> Result<(), HandlerError> {
    let Some(user) = sender_id(msg) else {
        return Ok(());
    };
    let Some(name) = arg else {
        bot.send_message(msg.chat.id, "❌ Usage: /pilih sheet_x.xlsx").await?;
        return Ok(());
    };
    if !deps.store.list_sheets(user)?.iter().any(|s| s == name) {
        bot.send_message(msg.chat.id, "❌ Spreadsheet not found").await?;
        return Ok(());
    }
    deps.store.set_active_sheet(user, name)?;
    bot.send_message(msg.chat.id, format!("✅ Active: {}", name)).await?;
    Ok(())
}

/// /hapus <name> - delete a sheet file; unknown names are rejected
pub async fn handle_delete_command(
    bot: &Bot,
    msg: &Message,
    deps: &HandlerDeps,
    arg: Option<&str>,
) -> Result<(), HandlerError> {
    let Some(user) = sender_id(msg) else {
        return Ok(());
    };
    let Some(name) = arg else {
        bot.send_message(msg.chat.id, "❌ Usage: /hapus sheet_x.xlsx").await?;
        return Ok(());
    };
    if !deps.sheets.sheet_path(user, name).exists() {
        bot.send_message(msg.chat.id, "❌ Not found").await?;
        return Ok(());
    }
    deps.sheets.delete_sheet(user, name)?;
    bot.send_message(msg.chat.id, "🗑 Spreadsheet deleted").await?;
    Ok(())
}

/// /get - send the active sheet as a document, creating one if needed
pub async fn handle_get_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let Some(user) = sender_id(msg) else {
        return Ok(());
    };
    let path = deps.sheets.ensure_active(deps.store.as_ref(), user)?;
    bot.send_document(msg.chat.id, InputFile::file(path)).await?;
    Ok(())
}

/// /c [off] - toggle the sticky cookie-mode flag
pub async fn handle_cookie_command(
    bot: &Bot,
    msg: &Message,
    deps: &HandlerDeps,
    arg: Option<&str>,
) -> Result<(), HandlerError> {
    let Some(user) = sender_id(msg) else {
        return Ok(());
    };
    if arg.is_some_and(|a| a.eq_ignore_ascii_case("off")) {
        deps.store.set_cookie_mode(user, false)?;
        bot.send_message(msg.chat.id, "❌ COOKIE MODE OFF").await?;
    } else {
        deps.store.set_cookie_mode(user, true)?;
        bot.send_message(
            msg.chat.id,
            "🍪 MANUAL COOKIE MODE ON (STAYS ON)\nPaste cookies as many times as you like.\nTurn off with: /c off",
        )
        .await?;
    }
    Ok(())
}
