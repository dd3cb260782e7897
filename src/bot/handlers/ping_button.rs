//! The persistent ping button and its confirm flow.
//!
//! A single message in the configured button channel carries the ping
//! button. Pressing it opens an ephemeral confirm prompt; confirming sends
//! the role ping and records the press. The message is discovered (or
//! created) on startup and repaired by the watchdog if it disappears or
//! loses its components.

use crate::bot::BotData;
use crate::core::cooldown::CooldownStatus;
use crate::errors::Result;
use chrono::Utc;
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::Mentionable;
use tracing::{error, info, warn};

/// Custom id of the always-visible ping button.
pub const BUTTON_ID: &str = "ping_tree_button";
/// Custom id of the confirm button in the ephemeral prompt.
pub const CONFIRM_ID: &str = "ping_tree_confirm";
/// Custom id of the cancel button in the ephemeral prompt.
pub const CANCEL_ID: &str = "ping_tree_cancel";

/// Stable fragment of the button message content, used to recognize the
/// message again after a restart.
const PROMPT_SNIPPET: &str = "Click this button to ping `@tree` role";

const TEST_MODE_SUFFIX: &str = " [I AM IN TEST MODE, PING ME FOR TESTING ☺]";
const BANNED_MESSAGE: &str = "You are banned from treebot ☻";

const fn test_suffix(test_mode: bool) -> &'static str {
    if test_mode {
        TEST_MODE_SUFFIX
    } else {
        ""
    }
}

fn prompt_content(test_mode: bool) -> String {
    format!(
        "{PROMPT_SNIPPET} when the tree needs watering!{}",
        test_suffix(test_mode)
    )
}

fn button_row() -> Vec<serenity::CreateActionRow> {
    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(BUTTON_ID)
            .label("Ping Tree Role")
            .style(serenity::ButtonStyle::Danger),
    ])]
}

fn confirm_row() -> Vec<serenity::CreateActionRow> {
    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(CONFIRM_ID)
            .label("Confirm Ping")
            .style(serenity::ButtonStyle::Danger),
        serenity::CreateButton::new(CANCEL_ID)
            .label("Cancel")
            .style(serenity::ButtonStyle::Secondary),
    ])]
}

async fn respond_ephemeral(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    content: &str,
) -> Result<()> {
    component
        .create_response(
            &ctx.http,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .content(content)
                    .ephemeral(true),
            ),
        )
        .await?;
    Ok(())
}

/// Replaces the ephemeral confirm prompt with `content` and drops its
/// buttons, closing the flow.
async fn update_response(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    content: &str,
) -> Result<()> {
    component
        .create_response(
            &ctx.http,
            serenity::CreateInteractionResponse::UpdateMessage(
                serenity::CreateInteractionResponseMessage::new()
                    .content(content)
                    .components(Vec::new()),
            ),
        )
        .await?;
    Ok(())
}

/// Handles the always-visible ping button: validates the user and opens the
/// ephemeral confirm prompt.
pub async fn handle_press(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &BotData,
) -> Result<()> {
    let user_id = component.user.id.get();
    info!("{} pressed the ping button", component.user.name);

    let (banned, test_mode) = {
        let state = data.state.read().await;
        (state.is_banned(user_id), state.test_mode)
    };
    if banned {
        warn!("Banned user {} tried the ping button", component.user.name);
        return respond_ephemeral(ctx, component, BANNED_MESSAGE).await;
    }

    // Bind the status so the cooldown lock is released before any await.
    let status = data.cooldowns_lock()?.check(user_id, Utc::now());
    if let CooldownStatus::Cooling { remaining_secs } = status {
        return respond_ephemeral(
            ctx,
            component,
            &format!("Please wait {remaining_secs} seconds before using this button again."),
        )
        .await;
    }

    if component.guild_id.is_none() {
        return respond_ephemeral(ctx, component, "This button can only be used in a server.")
            .await;
    }

    component
        .create_response(
            &ctx.http,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .content(format!(
                        "Are you sure you want to ping the role?{}",
                        test_suffix(test_mode)
                    ))
                    .components(confirm_row())
                    .ephemeral(true),
            ),
        )
        .await?;
    Ok(())
}

/// Handles the confirm button: re-validates, records the press, and sends
/// the role ping.
///
/// Ban and cooldown are checked again here since the confirm prompt can sit
/// open indefinitely. The cooldown starts at confirmation, not at the
/// initial press.
pub async fn handle_confirm(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &BotData,
) -> Result<()> {
    let user_id = component.user.id.get();

    if data.state.read().await.is_banned(user_id) {
        warn!(
            "Banned user {} tried to confirm a ping",
            component.user.name
        );
        return update_response(ctx, component, BANNED_MESSAGE).await;
    }
    let status = data.cooldowns_lock()?.check(user_id, Utc::now());
    if let CooldownStatus::Cooling { remaining_secs } = status {
        return update_response(
            ctx,
            component,
            &format!("Please wait {remaining_secs} seconds before using this button again."),
        )
        .await;
    }

    let snapshot = {
        let mut state = data.state.write().await;
        state.record_button_press(user_id);
        state.clone()
    };
    data.store.save(&snapshot)?;
    data.cooldowns_lock()?.record(user_id, Utc::now());
    info!("{} confirmed a role ping", component.user.name);

    update_response(ctx, component, "Pinged Tree Role!").await?;

    let test_mode = snapshot.test_mode;
    let role = if test_mode {
        data.config.discord.test_ping_role_id
    } else {
        data.config.discord.ping_role_id
    };
    let content = format!(
        "{} 🌲 Pinged by {}!{}",
        role.mention(),
        component.user.name,
        test_suffix(test_mode)
    );
    let sent = data
        .config
        .discord
        .ping_channel_id
        .send_message(&ctx.http, serenity::CreateMessage::new().content(content))
        .await;
    if let Err(e) = sent {
        error!("Failed to send role ping: {e}");
        component
            .create_followup(
                &ctx.http,
                serenity::CreateInteractionResponseFollowup::new()
                    .content("Failed to send the ping. Please try again.")
                    .ephemeral(true),
            )
            .await?;
    }
    Ok(())
}

/// Handles the cancel button in the confirm prompt.
pub async fn handle_cancel(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
) -> Result<()> {
    info!("{} cancelled a role ping", component.user.name);
    update_response(ctx, component, "Cancelled").await
}

/// Makes sure the button channel holds exactly one live button message.
///
/// Reuses a recognized message from a previous run when one exists, so
/// restarts do not litter the channel. Any other bot-authored messages in
/// the channel are cleaned up before a new one is posted.
pub async fn ensure_button_message(ctx: &serenity::Context, data: &BotData) -> Result<()> {
    let channel = data.config.discord.button_channel_id;
    let bot_id = ctx.cache.current_user().id;

    let messages = channel
        .messages(&ctx.http, serenity::GetMessages::new().limit(100))
        .await?;

    if let Some(existing) = messages
        .iter()
        .find(|m| m.author.id == bot_id && m.content.contains(PROMPT_SNIPPET))
    {
        *data.button_message.write().await = Some(existing.id);
        update_button_message(ctx, data).await?;
        info!("Reusing existing ping button message {}", existing.id);
        return Ok(());
    }

    for message in messages.iter().filter(|m| m.author.id == bot_id) {
        if let Err(e) = message.delete(&ctx.http).await {
            warn!("Failed to delete old bot message {}: {e}", message.id);
        }
    }

    let test_mode = data.state.read().await.test_mode;
    let sent = channel
        .send_message(
            &ctx.http,
            serenity::CreateMessage::new()
                .content(prompt_content(test_mode))
                .components(button_row()),
        )
        .await?;
    *data.button_message.write().await = Some(sent.id);
    info!("New ping button message created: {}", sent.id);
    Ok(())
}

/// Rewrites the tracked button message's content and components, picking up
/// the current test-mode flag. No-op until the message id is known.
pub async fn update_button_message(ctx: &serenity::Context, data: &BotData) -> Result<()> {
    let Some(message_id) = *data.button_message.read().await else {
        return Ok(());
    };
    let test_mode = data.state.read().await.test_mode;
    data.config
        .discord
        .button_channel_id
        .edit_message(
            &ctx.http,
            message_id,
            serenity::EditMessage::new()
                .content(prompt_content(test_mode))
                .components(button_row()),
        )
        .await?;
    Ok(())
}

/// Watchdog pass over the button message.
///
/// Restores stripped components in place and falls back to full rediscovery
/// when the tracked message cannot be fetched at all.
pub async fn repair_button_message(ctx: &serenity::Context, data: &BotData) -> Result<()> {
    let Some(message_id) = *data.button_message.read().await else {
        return ensure_button_message(ctx, data).await;
    };

    match data
        .config
        .discord
        .button_channel_id
        .message(&ctx.http, message_id)
        .await
    {
        Ok(message) => {
            if message.components.is_empty() {
                update_button_message(ctx, data).await?;
                info!("Restored button controls on existing message {message_id}");
            }
            Ok(())
        }
        Err(e) => {
            info!("Ping button message {message_id} is missing ({e}), recreating");
            *data.button_message.write().await = None;
            ensure_button_message(ctx, data).await
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    // Compile-time check that the handler futures are Send, as the gateway
    // runtime requires. Holding a lock guard across an await breaks this.
    #[allow(dead_code)]
    fn handler_futures_are_send(
        ctx: &serenity::Context,
        component: &serenity::ComponentInteraction,
        data: &BotData,
    ) {
        fn require_send<F: std::future::Future + Send>(_: F) {}
        require_send(handle_press(ctx, component, data));
        require_send(handle_confirm(ctx, component, data));
        require_send(handle_cancel(ctx, component));
    }

    #[test]
    fn test_suffix_only_in_test_mode() {
        assert_eq!(test_suffix(true), TEST_MODE_SUFFIX);
        assert_eq!(test_suffix(false), "");
    }

    #[test]
    fn test_prompt_contains_recognition_snippet() {
        assert!(prompt_content(true).contains(PROMPT_SNIPPET));
        assert!(prompt_content(false).contains(PROMPT_SNIPPET));
    }

    #[test]
    fn test_prompt_reflects_test_mode() {
        assert!(prompt_content(true).ends_with(TEST_MODE_SUFFIX));
        assert!(prompt_content(false).ends_with("when the tree needs watering!"));
    }

    #[test]
    fn test_custom_ids_are_distinct() {
        assert_ne!(BUTTON_ID, CONFIRM_ID);
        assert_ne!(BUTTON_ID, CANCEL_ID);
        assert_ne!(CONFIRM_ID, CANCEL_ID);
    }
}
