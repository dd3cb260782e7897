//! Persistent bot state: bans, leaderboard counters, and the test-mode flag.
//!
//! [`BotState`] is a plain serializable value. Mutation happens in memory
//! behind the bot's state lock; callers snapshot the mutated value and hand
//! it to a [`crate::store::Store`] to persist. Every field carries a serde
//! default so state files written by older versions keep loading.

use crate::core::stats::StatKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const fn default_test_mode() -> bool {
    true
}

/// Everything the bot persists between restarts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BotState {
    /// Users banned from the ping button
    #[serde(default)]
    pub banned_users: Vec<u64>,
    /// Confirmed ping button presses per user
    #[serde(default)]
    pub button_stats: HashMap<u64, u64>,
    /// Topic requests per user
    #[serde(default)]
    pub topic_stats: HashMap<u64, u64>,
    /// When set, pings target the test role instead of the real one
    #[serde(default = "default_test_mode")]
    pub test_mode: bool,
}

impl Default for BotState {
    fn default() -> Self {
        Self {
            banned_users: Vec::new(),
            button_stats: HashMap::new(),
            topic_stats: HashMap::new(),
            // Safe default: a fresh deployment pings the test role until an
            // admin explicitly switches over.
            test_mode: true,
        }
    }
}

impl BotState {
    /// Whether `user_id` is banned.
    #[must_use]
    pub fn is_banned(&self, user_id: u64) -> bool {
        self.banned_users.contains(&user_id)
    }

    /// Bans `user_id`. Returns false if they were already banned.
    pub fn ban(&mut self, user_id: u64) -> bool {
        if self.is_banned(user_id) {
            return false;
        }
        self.banned_users.push(user_id);
        true
    }

    /// Unbans `user_id`. Returns false if they were not banned.
    pub fn unban(&mut self, user_id: u64) -> bool {
        let before = self.banned_users.len();
        self.banned_users.retain(|&id| id != user_id);
        self.banned_users.len() != before
    }

    /// Increments the ping button counter for `user_id`, returning the new
    /// count.
    pub fn record_button_press(&mut self, user_id: u64) -> u64 {
        let count = self.button_stats.entry(user_id).or_insert(0);
        *count += 1;
        *count
    }

    /// Increments the topic counter for `user_id`, returning the new count.
    pub fn record_topic_use(&mut self, user_id: u64) -> u64 {
        let count = self.topic_stats.entry(user_id).or_insert(0);
        *count += 1;
        *count
    }

    /// Flips the test-mode flag, returning the new value.
    pub fn toggle_test_mode(&mut self) -> bool {
        self.test_mode = !self.test_mode;
        self.test_mode
    }

    /// The counter map backing the given leaderboard.
    #[must_use]
    pub const fn stats_for(&self, kind: StatKind) -> &HashMap<u64, u64> {
        match kind {
            StatKind::Button => &self.button_stats,
            StatKind::Topic => &self.topic_stats,
        }
    }
}
