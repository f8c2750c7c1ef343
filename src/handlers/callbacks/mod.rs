//! Callback query handlers module
//!
//! Dispatches inline keyboard callbacks. Payloads are short tagged strings:
//! `choose:<plate>` claims a plate from the registration match list,
//! `car:<row>` toggles an admin selection, `send_notify` fires the broadcast,
//! `checkin` and `change_car` are the post-registration menu actions.

use teloxide::{
    prelude::*,
    types::{CallbackQuery, ChatId, MaybeInaccessibleMessage},
    Bot,
};
use tracing::{debug, warn};

use crate::handlers::commands::{admin, start};
use crate::handlers::recover_failure;
use crate::services::ServiceFactory;
use crate::sheets::ClaimOutcome;
use crate::state::{EventKind, Flow, SessionStore};
use crate::texts;
use crate::utils::errors::Result;

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    services: ServiceFactory,
    sessions: SessionStore,
) -> Result<()> {
    let user = query.from.clone();
    let user_id = user.id.0 as i64;
    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(user_id));
    let message_id = match &query.message {
        Some(MaybeInaccessibleMessage::Regular(message)) => Some(message.id),
        _ => None,
    };

    // Answer first to clear the button's loading state
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, callback_id = %query.id, "Failed to answer callback query");
    }

    let Some(data) = query.data else {
        return Ok(());
    };
    debug!(user_id = user_id, callback_data = %data, "Dispatching callback");

    let (action, payload) = data.split_once(':').unwrap_or((data.as_str(), ""));
    match action {
        "choose" => {
            handle_choose(
                bot, chat_id, user_id, &user, payload, services, sessions,
            )
            .await
        }
        "car" => {
            if let Ok(row) = payload.parse::<u32>() {
                admin::handle_toggle_callback(
                    bot, chat_id, message_id, user_id, row, services, sessions,
                )
                .await
            } else {
                warn!(payload = payload, "Malformed car toggle payload");
                Ok(())
            }
        }
        "send_notify" => {
            admin::handle_send_callback(bot, chat_id, user_id, services, sessions).await
        }
        "checkin" => start::begin_inspection(&bot, chat_id, user_id, &services, &sessions).await,
        "change_car" => {
            start::handle_change_car(bot, chat_id, user_id, services, sessions).await
        }
        _ => {
            warn!(user_id = user_id, action = action, "Unknown callback action");
            Ok(())
        }
    }
}

/// A plate picked from the registration match list. Exactly one of two racing
/// claimants wins; the loser gets a conflict notice and goes back to search.
async fn handle_choose(
    bot: Bot,
    chat_id: ChatId,
    user_id: i64,
    user: &teloxide::types::User,
    plate: &str,
    services: ServiceFactory,
    sessions: SessionStore,
) -> Result<()> {
    let Some(flow) = sessions.flow(chat_id.0).await else {
        debug!(user_id = user_id, "Choose callback without an active flow, ignoring");
        return Ok(());
    };
    if !matches!(flow, Flow::AwaitingChoice { .. }) {
        debug!(user_id = user_id, state = ?flow.state(), "Stale choose button, ignoring");
        return Ok(());
    }

    let username = user
        .username
        .clone()
        .unwrap_or_else(|| user.full_name());

    match services
        .registration_service
        .claim_plate(plate, user_id, &username)
        .await
    {
        Ok(ClaimOutcome::Claimed) => {
            let next = flow.advance(
                EventKind::Choice,
                Flow::AwaitingPhotoOne {
                    plate: Some(plate.to_string()),
                },
            )?;
            sessions.set_flow(chat_id.0, next).await;
            bot.send_message(chat_id, texts::PLATE_CLAIMED).await?;
            bot.send_message(chat_id, texts::PHOTO_ONE_PROMPT).await?;
            Ok(())
        }
        Ok(ClaimOutcome::AlreadyAssigned { .. }) => {
            let next = flow.advance(EventKind::Choice, Flow::AwaitingSearch)?;
            sessions.set_flow(chat_id.0, next).await;
            bot.send_message(chat_id, texts::PLATE_TAKEN).await?;
            bot.send_message(chat_id, texts::SEARCH_PROMPT).await?;
            Ok(())
        }
        Err(e) => recover_failure(&bot, chat_id, &sessions, e).await,
    }
}
