//! JSON-file backed watch state.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use modwatch_core::{StateRepository, WatchState};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::{load_json, save_json};

/// Reads and writes the [`WatchState`] file.
///
/// The file is read once at the start of a cycle and written once at the
/// end; the process never runs two cycles at a time, so there is no locking.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Creates a store for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the state file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the state; a missing file yields the default state.
    pub async fn load(&self) -> Result<WatchState, StoreError> {
        match load_json(&self.path).await? {
            Some(state) => Ok(state),
            None => {
                info!(path = %self.path.display(), "No state file yet, starting without a baseline");
                Ok(WatchState::default())
            }
        }
    }

    /// Writes the state.
    pub async fn save(&self, state: &WatchState) -> Result<(), StoreError> {
        save_json(&self.path, state).await?;
        debug!(path = %self.path.display(), last_count = ?state.last_count, "State saved");
        Ok(())
    }
}

#[async_trait]
impl StateRepository for StateStore {
    type Error = StoreError;

    async fn load(&self) -> Result<WatchState, StoreError> {
        StateStore::load(self).await
    }

    async fn save(&self, state: &WatchState) -> Result<(), StoreError> {
        StateStore::save(self, state).await
    }
}
