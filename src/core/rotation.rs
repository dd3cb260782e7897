//! Topic rotation business logic.
//!
//! Tracks recently issued topics in a bounded history and keeps them out of
//! circulation for a cooldown window. Selection prefers topics that are not
//! in the recent history; once every topic is on cooldown, a recent topic is
//! reissued rather than leaving the caller empty-handed.
//!
//! The topic pool itself is re-read from disk on every selection, so edits
//! to the topic file take effect immediately.

use crate::core::pool;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Maximum number of entries retained in the recent-use history.
pub const HISTORY_CAP: usize = 1000;

/// Sentinel reply used when the topic pool is empty or unreadable.
pub const NO_TOPICS_MESSAGE: &str = "No topics available";

/// A single issued topic and the time it was handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The topic text exactly as issued
    pub topic: String,
    /// When the topic was issued
    pub issued_at: DateTime<Utc>,
}

/// Bounded recent-use history, oldest entries first.
#[derive(Debug, Default)]
pub struct RotationHistory {
    entries: VecDeque<HistoryEntry>,
}

impl RotationHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Drops every entry issued at or before `cutoff` and returns how many
    /// were removed.
    ///
    /// The boundary is deliberate: an entry issued exactly at `cutoff` has
    /// served its full cooldown window, so it is evicted.
    pub fn evict_before(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.issued_at > cutoff);
        before - self.entries.len()
    }

    /// Appends an entry, evicting the oldest entries first if the history
    /// is already at `cap`.
    pub fn push_with_cap(&mut self, entry: HistoryEntry, cap: usize) {
        if cap == 0 {
            return;
        }
        while self.entries.len() >= cap {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Whether `topic` is currently held in the history.
    #[must_use]
    pub fn contains_topic(&self, topic: &str) -> bool {
        self.entries.iter().any(|entry| entry.topic == topic)
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}

/// The outcome of a topic selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// The topic text to hand to the user
    pub topic: String,
    /// True when every topic was on cooldown and a recent one was reissued
    pub reused: bool,
}

/// Rotates through the topic pool while honoring the per-topic cooldown.
#[derive(Debug)]
pub struct TopicRotator {
    topics_file: PathBuf,
    cooldown: TimeDelta,
    history: RotationHistory,
}

impl TopicRotator {
    /// Creates a rotator reading its pool from `topics_file`, keeping each
    /// issued topic out of circulation for `cooldown`.
    pub fn new(topics_file: impl Into<PathBuf>, cooldown: TimeDelta) -> Self {
        Self {
            topics_file: topics_file.into(),
            cooldown,
            history: RotationHistory::new(),
        }
    }

    /// Path of the topic pool file.
    #[must_use]
    pub fn topics_file(&self) -> &Path {
        &self.topics_file
    }

    /// Read-only view of the recent-use history.
    #[must_use]
    pub const fn history(&self) -> &RotationHistory {
        &self.history
    }

    /// Reads the current pool, degrading to an empty pool if the file is
    /// unreadable. Selection then falls through to the sentinel reply
    /// instead of taking the whole command down.
    fn current_pool(&self) -> Vec<String> {
        match pool::load_topics(&self.topics_file) {
            Ok(topics) => topics,
            Err(e) => {
                warn!("Failed to load topic pool: {e}");
                Vec::new()
            }
        }
    }

    /// Returns the topics currently eligible for selection: the pool minus
    /// everything still inside its cooldown window.
    ///
    /// Expired history entries are evicted first, so a topic issued at `t0`
    /// becomes eligible again at exactly `t0 + cooldown`.
    pub fn eligible(&mut self, now: DateTime<Utc>) -> Vec<String> {
        self.history.evict_before(now - self.cooldown);
        let recent: HashSet<&str> = self.history.iter().map(|e| e.topic.as_str()).collect();
        self.current_pool()
            .into_iter()
            .filter(|topic| !recent.contains(topic.as_str()))
            .collect()
    }

    /// Selects a topic at `now`.
    ///
    /// Picks uniformly among eligible topics. If every topic is on cooldown
    /// the pick falls back to the full pool and `reused` is set. An empty or
    /// unreadable pool yields [`NO_TOPICS_MESSAGE`] without touching the
    /// history.
    pub fn select(&mut self, now: DateTime<Utc>) -> Selection {
        let eligible = self.eligible(now);
        let (topic, reused) = if eligible.is_empty() {
            let full_pool = self.current_pool();
            if full_pool.is_empty() {
                return Selection {
                    topic: NO_TOPICS_MESSAGE.to_string(),
                    reused: false,
                };
            }
            (pick(&full_pool), true)
        } else {
            (pick(&eligible), false)
        };

        self.history.push_with_cap(
            HistoryEntry {
                topic: topic.clone(),
                issued_at: now,
            },
            HISTORY_CAP,
        );
        Selection { topic, reused }
    }
}

/// Uniform random pick. Callers guarantee `topics` is non-empty.
fn pick(topics: &[String]) -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    topics[rng.random_range(0..topics.len())].clone()
}
