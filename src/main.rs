use dotenvy::dotenv;
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use treebot::bot::{self, BotData};
use treebot::config;
use treebot::core::rotation::TopicRotator;
use treebot::errors::{Error, Result};
use treebot::store::{JsonStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = config::load_app_configuration()?;
    info!("Successfully processed application configuration.");

    // 4. Load persisted state (missing file starts fresh, corrupt file is fatal)
    let store = JsonStore::new(&app_config.state.file);
    let state = store
        .load()
        .inspect(|_| info!("Bot state loaded successfully."))
        .inspect_err(|e| error!("Failed to load bot state: {}", e))?;

    // 5. Build the topic rotator on the configured pool file
    let rotator =
        TopicRotator::new(&app_config.topics.file, app_config.cooldowns.topic_cooldown());

    // 6. Run the bot
    // DISCORD_BOT_TOKEN is loaded here, directly before use, not stored in AppConfig
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    let data = BotData::new(Arc::new(app_config), Arc::new(store), state, rotator);
    bot::run_bot(token, data).await?;

    Ok(())
}
