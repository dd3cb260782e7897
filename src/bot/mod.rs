//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the TreeBot application,
//! including all slash commands, component interaction handlers, background
//! tasks, and the reconnecting client loop.

/// Discord command implementations (topic, leaderboard, moderation, admin)
pub mod commands;
/// Discord interaction handlers (component buttons, gateway events)
pub mod handlers;
/// Background presence rotation and button watchdog tasks
pub mod tasks;

use crate::config::AppConfig;
use crate::core::cooldown::CooldownTracker;
use crate::core::rotation::TopicRotator;
use crate::errors::{Error, Result};
use crate::state::BotState;
use crate::store::Store;
use poise::serenity_prelude as serenity;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

/// Connection attempts before giving up on the gateway.
const MAX_RECONNECT_ATTEMPTS: u32 = 5;
/// Base for the exponential reconnect backoff, in seconds.
const RECONNECT_BASE_SECS: u64 = 1;
/// Ceiling for the reconnect backoff, in seconds.
const RECONNECT_MAX_SECS: u64 = 300;

/// Shared data available to all bot commands and handlers.
///
/// Everything lives behind an `Arc` so the same data can be handed to the
/// framework, the event handler, and the background tasks.
#[derive(Debug, Clone)]
pub struct BotData {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Persistence backend for [`BotState`]
    pub store: Arc<dyn Store>,
    /// Mutable bot state (bans, counters, test mode)
    pub state: Arc<RwLock<BotState>>,
    /// Topic rotation with its recent-use history
    pub rotator: Arc<Mutex<TopicRotator>>,
    /// Per-user ping button cooldowns
    pub cooldowns: Arc<Mutex<CooldownTracker>>,
    /// Id of the persistent ping button message, once known
    pub button_message: Arc<RwLock<Option<serenity::MessageId>>>,
    /// Handles of the spawned background tasks
    pub background: Arc<tasks::BackgroundTasks>,
}

impl BotData {
    /// Creates the shared bot data from freshly loaded configuration and
    /// state.
    #[must_use]
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<dyn Store>,
        state: BotState,
        rotator: TopicRotator,
    ) -> Self {
        let cooldowns = CooldownTracker::new(config.cooldowns.button_cooldown());
        Self {
            config,
            store,
            state: Arc::new(RwLock::new(state)),
            rotator: Arc::new(Mutex::new(rotator)),
            cooldowns: Arc::new(Mutex::new(cooldowns)),
            button_message: Arc::new(RwLock::new(None)),
            background: Arc::new(tasks::BackgroundTasks::default()),
        }
    }

    /// Locks the topic rotator, mapping lock poisoning into an error.
    pub fn rotator_lock(&self) -> Result<MutexGuard<'_, TopicRotator>> {
        self.rotator
            .lock()
            .map_err(|_| Error::State("Failed to acquire rotator lock".to_string()))
    }

    /// Locks the cooldown tracker, mapping lock poisoning into an error.
    pub fn cooldowns_lock(&self) -> Result<MutexGuard<'_, CooldownTracker>> {
        self.cooldowns
            .lock()
            .map_err(|_| Error::State("Failed to acquire cooldown lock".to_string()))
    }
}

/// Checks that the invoking user holds one of the configured admin roles.
///
/// Replies ephemerally with a denial when they do not, so callers can simply
/// return early on `false`.
pub async fn ensure_admin(ctx: poise::Context<'_, BotData, Error>) -> Result<bool> {
    let admin_roles = &ctx.data().config.discord.admin_role_ids;
    let allowed = ctx
        .author_member()
        .await
        .is_some_and(|member| member.roles.iter().any(|role| admin_roles.contains(role)));

    if !allowed {
        warn!(
            "{} denied access to /{}",
            ctx.author().name,
            ctx.command().qualified_name
        );
        ctx.send(
            poise::CreateReply::default()
                .content("You do not have permission to use this command.")
                .ephemeral(true),
        )
        .await?;
    }
    Ok(allowed)
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            panic!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {}", error)).await {
                tracing::error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {}", e)
            }
        }
    }
}

fn build_framework(data: BotData) -> poise::Framework<BotData, Error> {
    poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::topic(),
                commands::leaderboard(),
                commands::ban(),
                commands::unban(),
                commands::listbanned(),
                commands::toggletestmode(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            pre_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "{} invoked /{}",
                        ctx.author().name,
                        ctx.command().qualified_name
                    );
                })
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::events::handle_event(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build()
}

/// Runs the bot until it shuts down cleanly or retries are exhausted.
///
/// Serenity already reconnects transparently on transient gateway drops; this
/// loop covers the hard failures where the client itself returns, retrying
/// with exponential backoff. Invalid credentials abort immediately since no
/// amount of retrying fixes a bad token.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let intents = serenity::GatewayIntents::non_privileged();

    let mut attempt: u32 = 0;
    loop {
        info!("Setting up Serenity client for Poise framework...");
        let framework = build_framework(data.clone());
        let run = async {
            let mut client = serenity::Client::builder(&token, intents)
                .framework(framework)
                .await?;
            info!("Starting bot client...");
            client.start().await
        }
        .await;

        // The old session's tasks hold a stale context; the next Ready event
        // spawns fresh ones.
        data.background.abort_all();

        match run {
            Ok(()) => {
                info!("Bot client shut down cleanly");
                return Ok(());
            }
            Err(e) if is_auth_failure(&e) => {
                error!("Authentication failed, not retrying: {e}");
                return Err(e.into());
            }
            Err(e) => {
                attempt += 1;
                if attempt >= MAX_RECONNECT_ATTEMPTS {
                    error!("Giving up after {attempt} failed connection attempts: {e}");
                    return Err(e.into());
                }
                let delay = reconnect_delay(attempt);
                warn!(
                    "Client error (attempt {attempt}/{MAX_RECONNECT_ATTEMPTS}), reconnecting in {}s: {e}",
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

fn reconnect_delay(attempt: u32) -> Duration {
    let secs = RECONNECT_BASE_SECS
        .saturating_mul(2_u64.saturating_pow(attempt))
        .min(RECONNECT_MAX_SECS);
    Duration::from_secs(secs)
}

fn is_auth_failure(error: &serenity::Error) -> bool {
    matches!(
        error,
        serenity::Error::Gateway(serenity::GatewayError::InvalidAuthentication)
    )
}

pub use commands::*;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_reconnect_delay_doubles() {
        assert_eq!(reconnect_delay(1), Duration::from_secs(2));
        assert_eq!(reconnect_delay(2), Duration::from_secs(4));
        assert_eq!(reconnect_delay(4), Duration::from_secs(16));
    }

    #[test]
    fn test_reconnect_delay_is_capped() {
        assert_eq!(reconnect_delay(9), Duration::from_secs(300));
        assert_eq!(reconnect_delay(u32::MAX), Duration::from_secs(300));
    }

    #[test]
    fn test_auth_failure_detection() {
        let auth = serenity::Error::Gateway(serenity::GatewayError::InvalidAuthentication);
        assert!(is_auth_failure(&auth));

        let other = serenity::Error::Other("connection reset");
        assert!(!is_auth_failure(&other));
    }
}
