//! Leaderboard embed rendering and page navigation.
//!
//! Navigation state lives entirely in button custom ids, so pages keep
//! working across restarts with no in-memory session. The kind-switch
//! buttons carry just the kind; prev/next additionally carry the page the
//! viewer is currently on.

use crate::bot::BotData;
use crate::core::stats::{self, LeaderboardPage, StatKind};
use crate::errors::Result;
use poise::serenity_prelude as serenity;
use tracing::warn;

/// Custom id prefix shared by every leaderboard control.
pub const NAV_PREFIX: &str = "lb:";

const LEADERBOARD_COLOR: u32 = 0x2E_CC71;

/// A decoded leaderboard control press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    /// Switch to the given leaderboard, starting at the first page.
    Show(StatKind),
    /// Go one page back from the given current page.
    Prev(StatKind, usize),
    /// Go one page forward from the given current page.
    Next(StatKind, usize),
}

fn switch_id(kind: StatKind) -> String {
    format!("{NAV_PREFIX}{}", kind.as_str())
}

fn prev_id(kind: StatKind, page: usize) -> String {
    format!("{NAV_PREFIX}prev:{}:{page}", kind.as_str())
}

fn next_id(kind: StatKind, page: usize) -> String {
    format!("{NAV_PREFIX}next:{}:{page}", kind.as_str())
}

/// Decodes a leaderboard control custom id. Returns `None` for ids that do
/// not belong to the leaderboard or fail to parse.
#[must_use]
pub fn parse_nav(custom_id: &str) -> Option<NavAction> {
    let rest = custom_id.strip_prefix(NAV_PREFIX)?;
    if let Some(kind) = StatKind::parse(rest) {
        return Some(NavAction::Show(kind));
    }

    let mut parts = rest.splitn(3, ':');
    let action = parts.next()?;
    let kind = StatKind::parse(parts.next()?)?;
    let page: usize = parts.next()?.parse().ok()?;
    match action {
        "prev" => Some(NavAction::Prev(kind, page)),
        "next" => Some(NavAction::Next(kind, page)),
        _ => None,
    }
}

/// Renders one leaderboard page as an embed, resolving user ids to names.
pub async fn render_embed(
    ctx: &serenity::Context,
    kind: StatKind,
    page: &LeaderboardPage,
) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .title(format!("Tree Bot {} Leaderboard", kind.title_word()))
        .description(format!("Page {}/{}", page.page + 1, page.max_page + 1))
        .color(LEADERBOARD_COLOR);

    for entry in &page.entries {
        let username = match serenity::UserId::new(entry.user_id).to_user(ctx).await {
            Ok(user) => user.name,
            Err(_) => format!("Unknown User ({})", entry.user_id),
        };
        embed = embed.field(
            format!("{}. {username}", entry.rank),
            format!("{}: {}", kind.entry_label(), entry.count),
            false,
        );
    }
    embed
}

/// Builds the control row for a rendered page.
#[must_use]
pub fn nav_row(kind: StatKind, page: &LeaderboardPage) -> Vec<serenity::CreateActionRow> {
    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(switch_id(StatKind::Button))
            .label("Button Stats")
            .style(serenity::ButtonStyle::Primary),
        serenity::CreateButton::new(switch_id(StatKind::Topic))
            .label("Topic Stats")
            .style(serenity::ButtonStyle::Primary),
        serenity::CreateButton::new(prev_id(kind, page.page))
            .label("⬅️ Previous")
            .style(serenity::ButtonStyle::Secondary),
        serenity::CreateButton::new(next_id(kind, page.page))
            .label("Next ➡️")
            .style(serenity::ButtonStyle::Secondary),
    ])]
}

/// Handles a leaderboard control press by rebuilding the embed in place.
///
/// Page arithmetic saturates and [`stats::build_page`] clamps, so pressing
/// past either end simply re-renders the boundary page.
pub async fn handle_nav(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &BotData,
) -> Result<()> {
    let Some(action) = parse_nav(&component.data.custom_id) else {
        warn!(
            "Unrecognized leaderboard control: {}",
            component.data.custom_id
        );
        return Ok(());
    };

    let (kind, target) = match action {
        NavAction::Show(kind) => (kind, 0),
        NavAction::Prev(kind, page) => (kind, page.saturating_sub(1)),
        NavAction::Next(kind, page) => (kind, page.saturating_add(1)),
    };

    let page = {
        let state = data.state.read().await;
        stats::build_page(state.stats_for(kind), target)
    };
    let embed = render_embed(ctx, kind, &page).await;

    component
        .create_response(
            &ctx.http,
            serenity::CreateInteractionResponse::UpdateMessage(
                serenity::CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .components(nav_row(kind, &page)),
            ),
        )
        .await?;
    Ok(())
}
