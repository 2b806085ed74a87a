use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rideshare_bot::bot::{self, Delivery};
use rideshare_bot::config::BotConfig;
use rideshare_bot::engine::{ConversationEngine, EngineSettings};
use rideshare_bot::localization::LocalizationManager;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting RideShare Telegram Bot");

    let config = BotConfig::from_env()?;
    info!(config = ?config, "Configuration loaded");

    let localization = Arc::new(LocalizationManager::from_dir(
        &config.locales_dir,
        &config.default_language,
    )?);
    info!(
        languages = ?localization.supported_languages(),
        "Localization initialized"
    );

    let engine = Arc::new(ConversationEngine::new(
        EngineSettings::from(&config),
        localization,
    ));
    let delivery = Arc::new(Delivery::from_config(&config));

    let bot = Bot::new(config.bot_token.clone());

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(bot::message_handler))
        .branch(Update::filter_callback_query().endpoint(bot::callback_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![engine, delivery])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
