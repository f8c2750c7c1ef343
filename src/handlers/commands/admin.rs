//! Admin broadcast handlers
//!
//! `/admin` renders every directory row as a toggle button plus a send
//! button. Toggles re-render the keyboard in place; send consumes the
//! selection and reports a delivery summary. Non-admins are silently
//! ignored throughout.

use std::collections::BTreeSet;

use teloxide::{
    prelude::*,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Message, MessageId},
    Bot,
};
use tracing::debug;

use crate::handlers::recover_failure;
use crate::models::VehicleRecord;
use crate::services::ServiceFactory;
use crate::state::SessionStore;
use crate::texts;
use crate::utils::errors::{FleetCheckError, Result};
use crate::utils::logging::log_admin_action;

/// Handle /admin command - show the vehicle selection list
pub async fn handle_admin_panel(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    sessions: SessionStore,
) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        FleetCheckError::InvalidInput("No user in message".to_string())
    })?;

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    if !services.is_admin(user_id) {
        return Ok(());
    }

    let records = match services.broadcast_service.list_vehicles().await {
        Ok(records) => records,
        Err(e) => return recover_failure(&bot, chat_id, &sessions, e).await,
    };
    let selection = sessions.selection(chat_id.0).await;

    bot.send_message(chat_id, texts::ADMIN_LIST_TITLE)
        .reply_markup(vehicle_keyboard(&records, &selection))
        .await?;

    log_admin_action(user_id, "open_panel", None);
    Ok(())
}

/// Toggle a row in the admin's selection and re-render the keyboard in place.
pub async fn handle_toggle_callback(
    bot: Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    user_id: i64,
    row: u32,
    services: ServiceFactory,
    sessions: SessionStore,
) -> Result<()> {
    if !services.is_admin(user_id) {
        return Ok(());
    }

    let selection = sessions.toggle_selection(chat_id.0, row).await;
    debug!(user_id = user_id, row = row, selected = selection.len(), "Toggled vehicle selection");

    let Some(message_id) = message_id else {
        // Stale keyboard on an inaccessible message; nothing to re-render.
        return Ok(());
    };

    let records = match services.broadcast_service.list_vehicles().await {
        Ok(records) => records,
        Err(e) => return recover_failure(&bot, chat_id, &sessions, e).await,
    };

    bot.edit_message_reply_markup(chat_id, message_id)
        .reply_markup(vehicle_keyboard(&records, &selection))
        .await?;
    Ok(())
}

/// Send the reminder to the selected rows and report the summary. The
/// selection is consumed even when some deliveries fail.
pub async fn handle_send_callback(
    bot: Bot,
    chat_id: ChatId,
    user_id: i64,
    services: ServiceFactory,
    sessions: SessionStore,
) -> Result<()> {
    if !services.is_admin(user_id) {
        return Ok(());
    }

    let selection = sessions.take_selection(chat_id.0).await;
    if selection.is_empty() {
        bot.send_message(chat_id, texts::ADMIN_NOTHING_SELECTED).await?;
        return Ok(());
    }

    match services.broadcast_service.send_reminders(&selection).await {
        Ok(summary) => {
            log_admin_action(
                user_id,
                "broadcast",
                Some(&format!("sent={} failed={}", summary.sent, summary.failed)),
            );
            bot.send_message(chat_id, summary.render()).await?;
            Ok(())
        }
        Err(e) => recover_failure(&bot, chat_id, &sessions, e).await,
    }
}

/// One toggle button per directory row, selected rows marked, send button
/// last.
fn vehicle_keyboard(
    records: &[VehicleRecord],
    selection: &BTreeSet<u32>,
) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = records
        .iter()
        .map(|record| {
            let mark = if selection.contains(&record.row) { "✅" } else { "🚘" };
            vec![InlineKeyboardButton::callback(
                format!("{mark} {}", record.plate),
                format!("car:{}", record.row),
            )]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback(
        texts::ADMIN_SEND_BUTTON,
        "send_notify",
    )]);
    InlineKeyboardMarkup::new(rows)
}
