//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Admin configuration commands
pub mod admin;

/// Leaderboard command
pub mod leaderboard;

/// Ban management commands
pub mod moderation;

/// Topic rotation command
pub mod topic;

// Export commands
pub use admin::*;
pub use leaderboard::*;
pub use moderation::*;
pub use topic::*;
