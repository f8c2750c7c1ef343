//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands
//! - Callback handlers for inline keyboard interactions
//! - Message handlers for text and photo messages

pub mod callbacks;
pub mod commands;
pub mod messages;

use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::{error, info};

use crate::state::SessionStore;
use crate::utils::errors::{FleetCheckError, Result};

/// Recover a failure at the handler boundary: log transient store failures,
/// clear the chat's flow (the user re-initiates) and surface the taxonomy's
/// user-facing message. Nothing propagates far enough to kill the dispatch
/// loop.
pub(crate) async fn recover_failure(
    bot: &Bot,
    chat_id: ChatId,
    sessions: &SessionStore,
    err: FleetCheckError,
) -> Result<()> {
    if err.is_transient() {
        error!(chat_id = chat_id.0, error = %err, "Store failure reached handler boundary");
    } else {
        info!(chat_id = chat_id.0, error = %err, "Handler recovered business error");
    }
    sessions.clear_flow(chat_id.0).await;
    bot.send_message(chat_id, err.user_message()).await?;
    Ok(())
}
