//! Ban management commands.
//! Banning blocks a user from the ping button; the ban list itself is
//! readable by anyone through `/listbanned`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{ensure_admin, BotData},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use tracing::info;

    /// Ban a user from using the tree bot
    #[poise::command(slash_command, guild_only)]
    pub async fn ban(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User to ban"] user: serenity::User,
    ) -> Result<()> {
        if !ensure_admin(ctx).await? {
            return Ok(());
        }

        let (changed, snapshot) = {
            let mut state = ctx.data().state.write().await;
            let changed = state.ban(user.id.get());
            (changed, state.clone())
        };
        if changed {
            ctx.data().store.save(&snapshot)?;
            info!("{} banned {}", ctx.author().name, user.name);
            ctx.say(format!("Banned {} from using the tree bot", user.name))
                .await?;
        } else {
            info!(
                "{} tried to ban {} who is already banned",
                ctx.author().name,
                user.name
            );
            ctx.say(format!("{} is already banned", user.name)).await?;
        }
        Ok(())
    }

    /// Unban a user from the tree bot
    #[poise::command(slash_command, guild_only)]
    pub async fn unban(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User to unban"] user: serenity::User,
    ) -> Result<()> {
        if !ensure_admin(ctx).await? {
            return Ok(());
        }

        let (changed, snapshot) = {
            let mut state = ctx.data().state.write().await;
            let changed = state.unban(user.id.get());
            (changed, state.clone())
        };
        if changed {
            ctx.data().store.save(&snapshot)?;
            info!("{} unbanned {}", ctx.author().name, user.name);
            ctx.say(format!("Unbanned {} from the tree bot", user.name))
                .await?;
        } else {
            ctx.say(format!("{} is not banned", user.name)).await?;
        }
        Ok(())
    }

    /// List all banned users
    #[poise::command(slash_command)]
    pub async fn listbanned(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let banned = ctx.data().state.read().await.banned_users.clone();
        if banned.is_empty() {
            ctx.say("No users are currently banned").await?;
            return Ok(());
        }

        let mut lines = vec!["Banned users:".to_string()];
        for user_id in banned {
            let name = match serenity::UserId::new(user_id)
                .to_user(ctx.serenity_context())
                .await
            {
                Ok(user) => user.name,
                Err(_) => format!("Unknown User ({user_id})"),
            };
            lines.push(format!("- {name} ({user_id})"));
        }
        ctx.say(lines.join("\n")).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
