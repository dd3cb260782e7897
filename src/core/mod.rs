//! Core business logic - framework-agnostic topic rotation, cooldowns, and leaderboards.
//!
//! Nothing in this module touches Discord. All operations take explicit
//! timestamps so behavior is fully deterministic under test.

/// Per-user press cooldown tracking
pub mod cooldown;

/// Topic pool loading from the line-delimited topic file
pub mod pool;

/// Recent-use history and random topic selection
pub mod rotation;

/// Leaderboard sorting and paging
pub mod stats;
