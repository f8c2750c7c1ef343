//! Fleetcheck Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::utils::command::BotCommands as TeloxideBotCommands;
use teloxide::{prelude::*, types::Update};
use tracing::{error, info, warn};

use fleetcheck::{
    config::Settings,
    handlers::{
        callbacks::handle_callback_query,
        commands::{admin, help, start},
        messages::handle_message,
    },
    services::ServiceFactory,
    sheets::{GoogleSheetsClient, ServiceAccountAuth, ServiceAccountKey},
    state::SessionStore,
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard keeps the file writer alive
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting Fleetcheck Telegram Bot...");

    // Initialize the spreadsheet backend
    info!("Loading service account key...");
    let key = ServiceAccountKey::from_file(&settings.sheets.service_account_path).await?;
    let auth = ServiceAccountAuth::new(key, reqwest::Client::new());
    let sheets = GoogleSheetsClient::new(auth, settings.sheets.spreadsheet_id.clone())?;

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);

    // Initialize services and session store
    info!("Initializing services...");
    let services = ServiceFactory::new(bot.clone(), &settings, Arc::new(sheets));
    let sessions = SessionStore::new(settings.session.ttl_seconds);

    // Abandoned conversations are evicted by TTL
    let _cleanup = sessions.spawn_cleanup(std::time::Duration::from_secs(
        settings.session.cleanup_interval_seconds,
    ));

    // Wrap in Arc for dependency injection
    let services_arc = Arc::new(services);
    let sessions_arc = Arc::new(sessions);

    let handler = create_handler();
    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![services_arc, sessions_arc])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    if let Some(webhook_url) = &settings.bot.webhook_url {
        info!(webhook_url = %webhook_url, port = ?settings.bot.webhook_port,
              "Webhook configured; this build delivers via polling");
    }

    info!("Fleetcheck bot is ready, starting polling...");
    dispatcher.dispatch().await;

    info!("Fleetcheck bot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<BotCommand>()
                        .endpoint(handle_commands),
                )
                .branch(dptree::endpoint(handle_messages)),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callbacks))
}

#[derive(TeloxideBotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Команды бота")]
enum BotCommand {
    #[command(description = "регистрация и осмотр автомобиля")]
    Start,
    #[command(description = "сменить закреплённый автомобиль")]
    ChangeCar,
    #[command(description = "панель администратора")]
    Admin,
    #[command(description = "справка")]
    Help,
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: BotCommand,
    services: Arc<ServiceFactory>,
    sessions: Arc<SessionStore>,
) -> HandlerResult {
    let services = (*services).clone();
    let sessions = (*sessions).clone();

    let result = match cmd {
        BotCommand::Start => start::handle_start(bot, msg, services, sessions).await,
        BotCommand::ChangeCar => {
            let chat_id = msg.chat.id;
            let user_id = msg.from.as_ref().map(|u| u.id.0 as i64).unwrap_or_default();
            start::handle_change_car(bot, chat_id, user_id, services, sessions).await
        }
        BotCommand::Admin => admin::handle_admin_panel(bot, msg, services, sessions).await,
        BotCommand::Help => help::handle_help(bot, msg).await,
    };

    if let Err(e) = result {
        error!(error = %e, "Error handling command");
        return Err(e.into());
    }
    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    services: Arc<ServiceFactory>,
    sessions: Arc<SessionStore>,
) -> HandlerResult {
    let services = (*services).clone();
    let sessions = (*sessions).clone();

    if let Err(e) = handle_message(bot, msg, services, sessions).await {
        error!(error = %e, "Error handling message");
        return Err(e.into());
    }
    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: teloxide::types::CallbackQuery,
    services: Arc<ServiceFactory>,
    sessions: Arc<SessionStore>,
) -> HandlerResult {
    let services = (*services).clone();
    let sessions = (*sessions).clone();

    if let Err(e) = handle_callback_query(bot, query, services, sessions).await {
        error!(error = %e, "Error handling callback query");
        return Err(e.into());
    }
    Ok(())
}
