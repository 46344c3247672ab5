use anisearch_bot::bot::handlers::{self, Command};
use anisearch_bot::bot::transport::TelegramTransport;
use anisearch_bot::config::Settings;
use anisearch_bot::jikan::JikanClient;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    // Load .env file
    dotenv().ok();

    init_logging();

    info!("Starting anime search bot...");

    let settings = init_settings();

    let jikan = Arc::new(JikanClient::new(&settings));
    info!("Jikan client initialized.");

    let bot = Bot::new(settings.telegram_token.clone());
    let transport = Arc::new(TelegramTransport::new(bot.clone()));

    info!("Bot is running...");

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![jikan, transport])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_settings() -> Settings {
    match Settings::new() {
        Ok(settings) => {
            info!("Configuration loaded successfully.");
            settings
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}

fn schema() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handle_callback))
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_command),
                )
                .branch(
                    // Anything else with text gets the unknown-command reply
                    Update::filter_message()
                        .filter(|msg: Message| msg.text().is_some())
                        .endpoint(handle_unknown),
                ),
        )
}

async fn handle_command(
    msg: Message,
    cmd: Command,
    jikan: Arc<JikanClient>,
    transport: Arc<TelegramTransport>,
) -> Result<(), teloxide::RequestError> {
    let chat_id = msg.chat.id;
    let res = match cmd {
        Command::Start => handlers::start(transport.as_ref(), chat_id).await,
        Command::Help => handlers::help(transport.as_ref(), chat_id).await,
        Command::Search(query) => {
            handlers::search(transport.as_ref(), &jikan, chat_id, &query).await
        }
    };
    if let Err(e) = res {
        error!("Command handler error: {:#}", e);
    }
    respond(())
}

async fn handle_unknown(
    msg: Message,
    transport: Arc<TelegramTransport>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::unknown_command(transport.as_ref(), msg.chat.id).await {
        error!("Unknown-command handler error: {:#}", e);
    }
    respond(())
}

async fn handle_callback(
    q: CallbackQuery,
    jikan: Arc<JikanClient>,
    transport: Arc<TelegramTransport>,
) -> Result<(), teloxide::RequestError> {
    let Some(data) = q.data.as_deref() else {
        return respond(());
    };
    let Some(chat_id) = q.message.as_ref().map(|msg| msg.chat().id) else {
        return respond(());
    };

    if let Err(e) =
        handlers::handle_callback(transport.as_ref(), &jikan, chat_id, &q.id.0, data).await
    {
        error!("Callback handler error: {:#}", e);
    }
    respond(())
}
