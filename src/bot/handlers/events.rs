//! Gateway event dispatch.
//!
//! Routes Ready, Resume, and component interactions to the right handler.
//! Slash commands never pass through here; poise dispatches those itself.

use crate::bot::handlers::{leaderboard, ping_button};
use crate::bot::{tasks, BotData};
use crate::errors::{Error, Result};
use poise::serenity_prelude as serenity;
use std::time::Duration;
use tracing::{error, info};

/// Framework event handler hooked into [`poise::FrameworkOptions`].
pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("Connected as {}", data_about_bot.user.name);
            if let Err(e) = ping_button::ensure_button_message(ctx, data).await {
                error!("Failed to ensure ping button message: {e}");
            }
            tasks::start_background_tasks(ctx, data);
        }
        serenity::FullEvent::Resume { .. } => {
            info!("Gateway session resumed");
            let ctx = ctx.clone();
            let data = data.clone();
            tokio::spawn(async move {
                // Give the session a moment to settle before poking the API.
                tokio::time::sleep(Duration::from_secs(1)).await;
                if let Err(e) = ping_button::repair_button_message(&ctx, &data).await {
                    error!("Failed to repair ping button after resume: {e}");
                }
            });
        }
        serenity::FullEvent::InteractionCreate { interaction } => {
            if let serenity::Interaction::Component(component) = interaction {
                dispatch_component(ctx, component, data).await?;
            }
        }
        _ => {}
    }
    Ok(())
}

async fn dispatch_component(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &BotData,
) -> Result<()> {
    match component.data.custom_id.as_str() {
        ping_button::BUTTON_ID => ping_button::handle_press(ctx, component, data).await,
        ping_button::CONFIRM_ID => ping_button::handle_confirm(ctx, component, data).await,
        ping_button::CANCEL_ID => ping_button::handle_cancel(ctx, component).await,
        id if id.starts_with(leaderboard::NAV_PREFIX) => {
            leaderboard::handle_nav(ctx, component, data).await
        }
        _ => Ok(()),
    }
}
