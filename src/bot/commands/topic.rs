//! Topic command - hands out the next discussion topic from the rotation.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };
    use chrono::Utc;
    use tracing::debug;

    /// Get a random discussion topic
    #[poise::command(slash_command)]
    pub async fn topic(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let user_id = ctx.author().id.get();

        let selection = ctx.data().rotator_lock()?.select(Utc::now());
        if selection.reused {
            debug!("Every topic is on cooldown, reissued a recent one");
        }

        let snapshot = {
            let mut state = ctx.data().state.write().await;
            state.record_topic_use(user_id);
            state.clone()
        };
        ctx.data().store.save(&snapshot)?;

        ctx.say(selection.topic).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
