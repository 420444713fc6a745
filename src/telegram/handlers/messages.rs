//! Plain-text message endpoint: classify and append

use teloxide::prelude::*;

use super::types::{sender_id, HandlerDeps, HandlerError};
use crate::classify::{classify, ClassifyInput};

/// Handle one free-form record message.
///
/// Reads the user's password and cookie-mode flag, classifies the text,
/// and either appends the resulting row to the active sheet or replies
/// with the rejection's message. Rejections touch no state; a storage
/// failure propagates out and fails only this request.
pub async fn handle_record_message(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(user) = sender_id(msg) else {
        return Ok(());
    };
    let text = text.trim();

    let password = deps.store.password(user)?;
    let cookie_mode = deps.store.cookie_mode(user);

    let input = ClassifyInput {
        text,
        password: password.as_deref(),
        cookie_mode,
    };

    match classify(&input) {
        Ok(row) => {
            let path = deps.sheets.ensure_active(deps.store.as_ref(), user)?;
            deps.sheets.append_row(&path, &row)?;
            log::info!("appended row for user {} to {}", user, path.display());
            bot.send_message(msg.chat.id, "✅ Row saved").await?;
        }
        Err(rejection) => {
            log::debug!("rejected message from user {}: {:?}", user, rejection);
            bot.send_message(msg.chat.id, rejection.user_message()).await?;
        }
    }
    Ok(())
}
