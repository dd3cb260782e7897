//! Discord interaction handlers
//!
//! This module provides handlers for gateway events and component
//! interactions such as the ping button confirm flow and leaderboard
//! page navigation.

/// Gateway event dispatch (Ready, Resume, component interactions)
pub mod events;
/// Leaderboard embed rendering and page navigation buttons
pub mod leaderboard;
/// Persistent ping button lifecycle and confirm flow
pub mod ping_button;
