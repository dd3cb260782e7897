//! Background tasks spawned once the gateway session is ready.
//!
//! Two loops run for the lifetime of a session: one rotates the bot's
//! playing-status through a fixed activity list, the other watches the
//! persistent ping button message and repairs it if it goes missing or
//! loses its components.

use crate::bot::handlers::ping_button;
use crate::bot::BotData;
use poise::serenity_prelude as serenity;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Statuses the presence loop cycles through.
const ACTIVITIES: [&str; 8] = [
    "Watering the tree 🌳",
    "Watching over the garden 🌻",
    "Shuffling leaves 🍂",
    "Burning other trees 🔥",
    "Analyzing growth data 📈",
    "Checking soil moisture levels 💧",
    "Syncing with global tree network 🌎",
    "Running diagnostics on root network 💻",
];

const PRESENCE_INTERVAL: Duration = Duration::from_secs(30);
const WATCHDOG_INTERVAL: Duration = Duration::from_secs(20);

/// Tracks the session's spawned background tasks.
#[derive(Debug, Default)]
pub struct BackgroundTasks {
    started: AtomicBool,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl BackgroundTasks {
    /// Aborts every running task and allows the next Ready event to spawn
    /// fresh ones.
    pub fn abort_all(&self) {
        if let Ok(mut handles) = self.handles.lock() {
            for handle in handles.drain(..) {
                handle.abort();
            }
        }
        self.started.store(false, Ordering::SeqCst);
    }
}

/// Spawns the presence and watchdog loops.
///
/// Ready can fire more than once per process (serenity reconnects on its
/// own), so the spawn is guarded to run once per session.
pub fn start_background_tasks(ctx: &serenity::Context, data: &BotData) {
    if data.background.started.swap(true, Ordering::SeqCst) {
        return;
    }

    let presence = tokio::spawn(presence_loop(ctx.clone()));
    let watchdog = tokio::spawn(watchdog_loop(ctx.clone(), data.clone()));
    if let Ok(mut handles) = data.background.handles.lock() {
        handles.push(presence);
        handles.push(watchdog);
    }
    info!("Started presence and button watchdog background tasks");
}

async fn presence_loop(ctx: serenity::Context) {
    let mut interval = tokio::time::interval(PRESENCE_INTERVAL);
    loop {
        interval.tick().await;
        let idx = rand::rng().random_range(0..ACTIVITIES.len());
        ctx.set_activity(Some(serenity::ActivityData::playing(ACTIVITIES[idx])));
    }
}

async fn watchdog_loop(ctx: serenity::Context, data: BotData) {
    let mut interval = tokio::time::interval(WATCHDOG_INTERVAL);
    loop {
        interval.tick().await;
        if let Err(e) = ping_button::repair_button_message(&ctx, &data).await {
            error!("Button watchdog error: {e}");
        }
    }
}
