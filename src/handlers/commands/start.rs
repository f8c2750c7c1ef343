//! Start and change-car handlers
//!
//! `/start` either drops a registered driver into the post-registration menu
//! or opens the registration flow; `/changecar` releases the current
//! assignment and restarts registration. The inspection entry point lives
//! here too because both the menu button and a successful claim lead into it.

use teloxide::{
    prelude::*,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Message},
    Bot,
};
use tracing::{debug, info};

use crate::handlers::recover_failure;
use crate::services::ServiceFactory;
use crate::state::{Flow, SessionStore};
use crate::texts;
use crate::utils::errors::{FleetCheckError, Result};

/// Handle /start command - entry point for drivers
pub async fn handle_start(
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

    debug!(user_id = user_id, chat_id = ?chat_id, "Processing /start command");

    // Flows only make sense in private chats
    if !chat_id.is_user() {
        return Ok(());
    }

    match services.registration_service.assigned_plate(user_id).await {
        Ok(Some(plate)) => {
            info!(user_id = user_id, plate = %plate, "Registered driver started bot");
            show_menu(&bot, chat_id, &plate).await
        }
        Ok(None) => {
            info!(user_id = user_id, "Unregistered driver, opening registration");
            begin_search(&bot, chat_id, &sessions).await
        }
        Err(e) => recover_failure(&bot, chat_id, &sessions, e).await,
    }
}

/// Handle /changecar command and the menu's change-car button
pub async fn handle_change_car(
    bot: Bot,
    chat_id: ChatId,
    user_id: i64,
    services: ServiceFactory,
    sessions: SessionStore,
) -> Result<()> {
    debug!(user_id = user_id, "Driver changing vehicle");

    if let Err(e) = services.registration_service.release(user_id).await {
        return recover_failure(&bot, chat_id, &sessions, e).await;
    }

    bot.send_message(chat_id, texts::CAR_RELEASED).await?;
    begin_search(&bot, chat_id, &sessions).await
}

/// Open the registration flow: prompt for a digit query.
pub async fn begin_search(bot: &Bot, chat_id: ChatId, sessions: &SessionStore) -> Result<()> {
    sessions.set_flow(chat_id.0, Flow::AwaitingSearch).await;
    bot.send_message(chat_id, texts::SEARCH_PROMPT).await?;
    Ok(())
}

/// Open the inspection flow, pre-filling the plate from the caller's
/// directory assignment when one exists.
pub async fn begin_inspection(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    services: &ServiceFactory,
    sessions: &SessionStore,
) -> Result<()> {
    let plate = match services.inspection_service.plate_for(user_id).await {
        Ok(plate) => plate,
        Err(e) => return recover_failure(bot, chat_id, sessions, e).await,
    };

    debug!(user_id = user_id, plate = ?plate, "Opening inspection flow");
    sessions
        .set_flow(chat_id.0, Flow::AwaitingPhotoOne { plate })
        .await;
    bot.send_message(chat_id, texts::PHOTO_ONE_PROMPT).await?;
    Ok(())
}

/// Post-registration menu: start an inspection or change the vehicle.
pub async fn show_menu(bot: &Bot, chat_id: ChatId, plate: &str) -> Result<()> {
    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(texts::MENU_CHECKIN, "checkin")],
        vec![InlineKeyboardButton::callback(
            texts::MENU_CHANGE_CAR,
            "change_car",
        )],
    ]);

    bot.send_message(chat_id, texts::fill(texts::MENU_REGISTERED, "plate", plate))
        .reply_markup(keyboard)
        .await?;
    Ok(())
}
