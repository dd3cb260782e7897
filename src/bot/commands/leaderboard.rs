//! Leaderboard command - ranked usage counters with paging buttons.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{handlers, BotData},
        core::stats::{self, StatKind},
        errors::{Error, Result},
    };

    /// Show TreeBot leaderboard
    #[poise::command(slash_command)]
    pub async fn leaderboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let kind = StatKind::Button;
        let page = {
            let state = ctx.data().state.read().await;
            stats::build_page(state.stats_for(kind), 0)
        };
        let embed =
            handlers::leaderboard::render_embed(ctx.serenity_context(), kind, &page).await;

        ctx.send(
            poise::CreateReply::default()
                .embed(embed)
                .components(handlers::leaderboard::nav_row(kind, &page)),
        )
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
