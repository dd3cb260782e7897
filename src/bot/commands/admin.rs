//! Admin configuration commands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{ensure_admin, handlers::ping_button, BotData},
        errors::{Error, Result},
    };
    use tracing::{info, warn};

    /// Toggle test mode on/off
    #[poise::command(slash_command, guild_only)]
    pub async fn toggletestmode(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        if !ensure_admin(ctx).await? {
            return Ok(());
        }

        let (enabled, snapshot) = {
            let mut state = ctx.data().state.write().await;
            let enabled = state.toggle_test_mode();
            (enabled, state.clone())
        };
        ctx.data().store.save(&snapshot)?;
        info!(
            "{} switched test mode {}",
            ctx.author().name,
            if enabled { "on" } else { "off" }
        );

        // The button message carries the test-mode banner.
        if let Err(e) =
            ping_button::update_button_message(ctx.serenity_context(), ctx.data()).await
        {
            warn!("Failed to refresh button message after mode change: {e}");
        }

        let status = if enabled { "enabled" } else { "disabled" };
        ctx.say(format!("Test mode {status}")).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
