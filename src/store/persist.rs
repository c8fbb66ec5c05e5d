//! Durable storage for the persisted subset of app state.
//!
//! Only the allow-listed fields in [`PersistedState`] are ever written. The
//! file is plain JSON, rewritten whole on every save.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;

use super::{Language, Theme, UserProgress};

/// Errors that can occur while persisting preferences
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The allow-listed fields written to disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub current_language: Language,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub favorite_videos: Vec<String>,
    #[serde(default)]
    pub completed_videos: Vec<String>,
    #[serde(default)]
    pub user_progress: UserProgress,
}

/// Versioned envelope around the persisted state
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageEnvelope {
    version: u32,
    state: PersistedState,
}

const STORAGE_VERSION: u32 = 1;

/// JSON file holding the persisted state
#[derive(Debug, Clone)]
pub struct PreferenceFile {
    path: PathBuf,
}

impl PreferenceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted state; a missing file yields `None`
    pub async fn load(&self) -> Result<Option<PersistedState>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).await?;
        let envelope: StorageEnvelope = serde_json::from_str(&content)?;
        Ok(Some(envelope.state))
    }

    /// Write the persisted state, creating parent directories
    pub async fn save(&self, state: &PersistedState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let envelope = StorageEnvelope {
            version: STORAGE_VERSION,
            state: state.clone(),
        };
        let content = serde_json::to_string_pretty(&envelope)?;
        fs::write(&self.path, content).await?;

        tracing::debug!(path = %self.path.display(), "Preferences saved");
        Ok(())
    }

    /// Delete the file if present
    pub async fn clear(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path).await?;
        }
        Ok(())
    }
}
