//! Message handlers module
//!
//! Routes free-text and photo messages by the chat's current flow state.
//! Input the current state does not accept re-prompts in place with no
//! transition; store failures are recovered at this boundary.

use teloxide::{
    prelude::*,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Message},
    Bot,
};
use tracing::debug;

use crate::handlers::recover_failure;
use crate::models::VehicleRecord;
use crate::services::{SearchOutcome, ServiceFactory};
use crate::state::{EventKind, Flow, FlowState, SessionStore};
use crate::texts;
use crate::utils::errors::Result;
use crate::utils::plate::looks_like_plate;

/// Handle incoming non-command messages
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    sessions: SessionStore,
) -> Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    // Flows only run in private chats
    if !chat_id.is_user() {
        return Ok(());
    }

    let Some(flow) = sessions.flow(chat_id.0).await else {
        if msg.text().is_some() {
            bot.send_message(chat_id, texts::USE_START).await?;
        }
        return Ok(());
    };

    let event = classify(&msg);
    debug!(user_id = user_id, state = ?flow.state(), event = ?event, "Routing flow message");

    // Wrong input kind for the state: re-prompt in place, no transition,
    // nothing logged as an error.
    let Some(event) = event.filter(|event| flow.accepts(*event)) else {
        bot.send_message(chat_id, reprompt_for(flow.state())).await?;
        return Ok(());
    };

    let reporter = user
        .username
        .clone()
        .unwrap_or_else(|| user.full_name());

    let outcome = match (flow, event) {
        (Flow::AwaitingSearch, EventKind::Text) => {
            handle_search_input(&bot, chat_id, msg.text().unwrap_or_default(), &services, &sessions)
                .await
        }
        (Flow::AwaitingPhotoOne { plate }, EventKind::Photo) => {
            let photo_one = photo_ref(&msg).unwrap_or_default();
            sessions
                .set_flow(chat_id.0, Flow::AwaitingPhotoTwo { plate, photo_one })
                .await;
            bot.send_message(chat_id, texts::PHOTO_TWO_PROMPT).await?;
            Ok(())
        }
        (Flow::AwaitingPhotoTwo { plate, photo_one }, EventKind::Photo) => {
            let photo_two = photo_ref(&msg).unwrap_or_default();
            match plate {
                Some(plate) => {
                    finish_inspection(
                        &bot, chat_id, user_id, &reporter, &plate, &photo_one, &photo_two,
                        &services, &sessions,
                    )
                    .await
                }
                None => {
                    sessions
                        .set_flow(
                            chat_id.0,
                            Flow::AwaitingPlateNumber {
                                photo_one,
                                photo_two,
                            },
                        )
                        .await;
                    bot.send_message(chat_id, texts::PLATE_PROMPT).await?;
                    Ok(())
                }
            }
        }
        (Flow::AwaitingPlateNumber { photo_one, photo_two }, EventKind::Text) => {
            let typed = msg.text().unwrap_or_default();
            if !looks_like_plate(typed) {
                bot.send_message(chat_id, texts::PLATE_INVALID).await?;
                return Ok(());
            }
            finish_inspection(
                &bot, chat_id, user_id, &reporter, typed, &photo_one, &photo_two, &services,
                &sessions,
            )
            .await
        }
        // Unreachable given the accepts() guard above
        _ => Ok(()),
    };

    match outcome {
        Ok(()) => Ok(()),
        Err(e) => recover_failure(&bot, chat_id, &sessions, e).await,
    }
}

/// Registration search input: too short and empty results loop in place,
/// matches render one button per plate and move to choice.
async fn handle_search_input(
    bot: &Bot,
    chat_id: ChatId,
    input: &str,
    services: &ServiceFactory,
    sessions: &SessionStore,
) -> Result<()> {
    match services.registration_service.search(input).await? {
        SearchOutcome::QueryTooShort => {
            bot.send_message(chat_id, texts::SEARCH_TOO_SHORT).await?;
        }
        SearchOutcome::NoMatches => {
            bot.send_message(chat_id, texts::SEARCH_NO_MATCHES).await?;
        }
        SearchOutcome::Matches(records) => {
            let plates: Vec<String> = records.iter().map(|r| r.plate.clone()).collect();
            sessions
                .set_flow(chat_id.0, Flow::AwaitingChoice { matches: plates })
                .await;
            bot.send_message(chat_id, texts::SEARCH_CHOOSE)
                .reply_markup(plate_keyboard(&records))
                .await?;
        }
    }
    Ok(())
}

async fn finish_inspection(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    reporter: &str,
    plate: &str,
    photo_one: &str,
    photo_two: &str,
    services: &ServiceFactory,
    sessions: &SessionStore,
) -> Result<()> {
    services
        .inspection_service
        .record_inspection(user_id, reporter, plate, photo_one, photo_two)
        .await?;
    sessions.clear_flow(chat_id.0).await;
    bot.send_message(chat_id, texts::INSPECTION_DONE).await?;
    Ok(())
}

fn classify(msg: &Message) -> Option<EventKind> {
    if msg.photo().is_some() {
        Some(EventKind::Photo)
    } else if msg.text().is_some() {
        Some(EventKind::Text)
    } else {
        None
    }
}

/// Highest-resolution photo variant's file id.
fn photo_ref(msg: &Message) -> Option<String> {
    msg.photo()
        .and_then(|sizes| sizes.last())
        .map(|size| size.file.id.to_string())
}

fn reprompt_for(state: FlowState) -> &'static str {
    match state {
        FlowState::AwaitingSearch => texts::SEARCH_PROMPT,
        FlowState::AwaitingChoice => texts::SEARCH_CHOOSE,
        FlowState::AwaitingPhotoOne => texts::PHOTO_EXPECTED,
        FlowState::AwaitingPhotoTwo => texts::PHOTO_EXPECTED,
        FlowState::AwaitingPlateNumber => texts::PLATE_PROMPT,
    }
}

fn plate_keyboard(records: &[VehicleRecord]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(records.iter().map(|record| {
        vec![InlineKeyboardButton::callback(
            format!("🚘 {}", record.plate),
            format!("choose:{}", record.plate),
        )]
    }))
}
