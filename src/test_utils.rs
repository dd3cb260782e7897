//! Shared test utilities for `TreeBot`.
//!
//! This module provides an in-memory [`Store`] so state-mutating paths can be
//! exercised without touching disk, plus small fixtures for topic files and
//! timestamps.

use crate::errors::{Error, Result};
use crate::state::BotState;
use crate::store::Store;
use chrono::{DateTime, TimeDelta, Utc};
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

/// In-memory store recording how often it was asked to save.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<BotState>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    /// Creates a store preloaded with `state`.
    #[must_use]
    pub fn with_state(state: BotState) -> Self {
        Self {
            state: Mutex::new(state),
            saves: Mutex::new(0),
        }
    }

    /// The most recently saved state.
    pub fn saved(&self) -> Result<BotState> {
        Ok(self
            .state
            .lock()
            .map_err(|_| Error::State("Failed to acquire store lock".to_string()))?
            .clone())
    }

    /// How many times [`Store::save`] was called.
    pub fn save_count(&self) -> Result<usize> {
        Ok(*self
            .saves
            .lock()
            .map_err(|_| Error::State("Failed to acquire store lock".to_string()))?)
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<BotState> {
        self.saved()
    }

    fn save(&self, state: &BotState) -> Result<()> {
        *self
            .state
            .lock()
            .map_err(|_| Error::State("Failed to acquire store lock".to_string()))? = state.clone();
        *self
            .saves
            .lock()
            .map_err(|_| Error::State("Failed to acquire store lock".to_string()))? += 1;
        Ok(())
    }
}

/// Writes `lines` to a fresh temporary topic file and returns the directory
/// guard along with the file path. Keep the guard alive for the test's
/// duration or the file disappears.
pub fn write_topics(lines: &[&str]) -> Result<(TempDir, PathBuf)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("topics.txt");
    let mut contents = lines.join("\n");
    contents.push('\n');
    std::fs::write(&path, contents)?;
    Ok((dir, path))
}

/// Timestamp `secs` seconds past the Unix epoch.
#[must_use]
pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(secs)
}
