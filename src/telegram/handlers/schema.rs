//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::commands::{
    handle_cookie_command, handle_delete_command, handle_get_command, handle_help_command, handle_list_command,
    handle_new_command, handle_select_command, handle_set_command,
};
use super::messages::handle_record_message;
use super::types::{HandlerDeps, HandlerError};
use crate::telegram::bot::Command;

/// Creates the main dispatcher schema for the bot.
///
/// Returns a handler tree for teloxide's Dispatcher. The same schema is
/// used in production and can be reused in integration tests.
///
/// Argument-carrying commands come first as prefix-filtered branches so a
/// bare `/set` yields a usage reply, then the no-argument command branch,
/// and finally the plain-text branch feeding the classifier.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_set = deps.clone();
    let deps_select = deps.clone();
    let deps_delete = deps.clone();
    let deps_cookie = deps.clone();
    let deps_commands = deps.clone();
    let deps_messages = deps;

    dptree::entry()
        .branch(set_password_handler(deps_set))
        .branch(select_sheet_handler(deps_select))
        .branch(delete_sheet_handler(deps_delete))
        .branch(cookie_mode_handler(deps_cookie))
        .branch(command_handler(deps_commands))
        .branch(message_handler(deps_messages))
}

/// True when the message's first whitespace token is exactly `command`.
/// An `@botname` suffix (the form Telegram sends in groups) is ignored.
fn first_token_is(msg: &Message, command: &str) -> bool {
    msg.text()
        .and_then(|text| text.split_whitespace().next())
        .is_some_and(|token| token.split('@').next().unwrap_or(token) == command)
}

/// First argument token after the command, if any.
fn first_arg(msg: &Message) -> Option<String> {
    msg.text()
        .and_then(|text| text.split_whitespace().nth(1))
        .map(|arg| arg.to_string())
}

/// Handler for /set <password>
fn set_password_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| first_token_is(&msg, "/set"))
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let arg = first_arg(&msg);
                handle_set_command(&bot, &msg, &deps, arg.as_deref()).await
            }
        })
}

/// Handler for /pilih <name>
fn select_sheet_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| first_token_is(&msg, "/pilih"))
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let arg = first_arg(&msg);
                handle_select_command(&bot, &msg, &deps, arg.as_deref()).await
            }
        })
}

/// Handler for /hapus <name>
fn delete_sheet_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| first_token_is(&msg, "/hapus"))
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let arg = first_arg(&msg);
                handle_delete_command(&bot, &msg, &deps, arg.as_deref()).await
            }
        })
}

/// Handler for /c [off]
fn cookie_mode_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| first_token_is(&msg, "/c"))
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let arg = first_arg(&msg);
                handle_cookie_command(&bot, &msg, &deps, arg.as_deref()).await
            }
        })
}

/// Handler for the no-argument bot commands
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("received command {:?} from chat {}", cmd, msg.chat.id);
                match cmd {
                    Command::Start | Command::Help => handle_help_command(&bot, &msg).await?,
                    Command::New => handle_new_command(&bot, &msg, &deps).await?,
                    Command::List => handle_list_command(&bot, &msg, &deps).await?,
                    Command::Get => handle_get_command(&bot, &msg, &deps).await?,
                }
                Ok(())
            }
        },
    ))
}

/// Handler for plain-text record messages
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| {
            msg.text()
                .is_some_and(|text| !text.trim_start().starts_with('/'))
        })
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move { handle_record_message(&bot, &msg, &deps).await }
        })
}
