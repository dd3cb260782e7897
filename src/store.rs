//! State persistence.
//!
//! The bot only needs load-at-startup and save-after-mutation, so the store
//! surface is exactly those two operations. [`JsonStore`] is the production
//! implementation, writing pretty-printed JSON to a single file; tests swap
//! in an in-memory store.

use crate::errors::{Error, Result};
use crate::state::BotState;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Loads and saves the persistent [`BotState`].
pub trait Store: Send + Sync + std::fmt::Debug {
    /// Loads the persisted state, or a default when nothing was persisted
    /// yet.
    fn load(&self) -> Result<BotState>;

    /// Persists `state`, replacing whatever was stored before.
    fn save(&self, state: &BotState) -> Result<()>;
}

/// File-backed store keeping the whole state as one JSON document.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for JsonStore {
    #[instrument(skip(self))]
    fn load(&self) -> Result<BotState> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No state file at {:?}, starting fresh", self.path);
                return Ok(BotState::default());
            }
            Err(e) => return Err(Error::Io(e)),
        };
        if raw.trim().is_empty() {
            info!("State file {:?} is empty, starting fresh", self.path);
            return Ok(BotState::default());
        }

        // A file that exists but does not parse is a real problem; silently
        // replacing it would throw away bans and leaderboards.
        serde_json::from_str(&raw)
            .map_err(|e| Error::Store(format!("Failed to parse {:?}: {e}", self.path)))
    }

    #[instrument(skip(self, state))]
    fn save(&self, state: &BotState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| Error::Store(format!("Failed to serialize state: {e}")))?;
        fs::write(&self.path, json)?;
        debug!("Saved state to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("state.json"));

        assert_eq!(store.load().unwrap(), BotState::default());
    }

    #[test]
    fn test_empty_file_loads_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "  \n").unwrap();

        let store = JsonStore::new(path);
        assert_eq!(store.load().unwrap(), BotState::default());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("state.json"));

        let mut state = BotState::default();
        state.ban(11);
        state.record_button_press(11);
        state.test_mode = false;

        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested/data/state.json"));

        store.save(&BotState::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonStore::new(path);
        assert!(matches!(store.load(), Err(Error::Store(_))));
    }

    #[test]
    fn test_save_overwrites_previous_state() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("state.json"));

        let mut first = BotState::default();
        first.ban(1);
        store.save(&first).unwrap();

        let second = BotState::default();
        store.save(&second).unwrap();
        assert_eq!(store.load().unwrap(), second);
    }

    #[test]
    fn test_memory_store_behaves_like_a_store() {
        let mut preloaded = BotState::default();
        preloaded.ban(7);

        let memory = crate::test_utils::MemoryStore::with_state(preloaded.clone());
        let store: &dyn Store = &memory;
        assert_eq!(store.load().unwrap(), preloaded);

        let mut state = preloaded;
        state.record_topic_use(7);
        store.save(&state).unwrap();
        store.save(&state).unwrap();

        assert_eq!(store.load().unwrap(), state);
        assert_eq!(memory.saved().unwrap(), state);
        assert_eq!(memory.save_count().unwrap(), 2);
    }
}
