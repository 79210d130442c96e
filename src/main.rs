use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use what_to_cook::assistant::CookingAssistant;
use what_to_cook::bot;
use what_to_cook::catalog::Catalog;
use what_to_cook::config::{BotConfig, LogFormat};

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;
    init_logging(config.log_format);

    info!("Starting What To Cook Telegram Bot");

    let catalog = match &config.dishes_path {
        Some(path) => Catalog::from_path(path)
            .with_context(|| format!("Failed to load dish catalog from {}", path.display()))?,
        None => Catalog::builtin().context("Built-in dish catalog is invalid")?,
    };
    info!(dishes = catalog.len(), "Dish catalog ready");

    let assistant = Arc::new(CookingAssistant::new(catalog, config.access.clone()));

    // Initialize the bot
    let bot = Bot::new(&config.telegram_token);
    bot::register_commands(&bot)
        .await
        .context("Failed to register bot commands")?;

    info!("Bot initialized, starting dispatcher");

    Dispatcher::builder(bot, bot::schema())
        .dependencies(dptree::deps![assistant, config.ui.clone()])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
