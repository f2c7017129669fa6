// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted snapshot format and file-backed store.

use std::path::{Path, PathBuf};

use emora_core::EmoraError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::state::{ConversationState, ConversationTurn, INITIAL_EMOTION};

/// JSON form of a [`ConversationState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub turns: Vec<ConversationTurn>,
    #[serde(default = "default_dominant_emotion")]
    pub dominant_emotion: String,
    #[serde(default)]
    pub emotion_history: Vec<String>,
}

fn default_dominant_emotion() -> String {
    INITIAL_EMOTION.to_string()
}

fn snapshot_err(message: impl Into<String>, e: impl std::error::Error + Send + Sync + 'static) -> EmoraError {
    EmoraError::Snapshot {
        message: message.into(),
        source: Some(Box::new(e)),
    }
}

/// Reads and writes a snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted state.
    ///
    /// Never fails: a missing or blank file yields an empty state, and an
    /// unreadable or malformed file is logged and also yields an empty state.
    pub async fn load(&self, capacity: usize) -> ConversationState {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no conversation snapshot, starting fresh");
                return ConversationState::new(capacity);
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read conversation snapshot, starting fresh");
                return ConversationState::new(capacity);
            }
        };

        if content.trim().is_empty() {
            return ConversationState::new(capacity);
        }

        let parsed = serde_json::from_str::<Snapshot>(&content)
            .map_err(|e| snapshot_err("malformed snapshot JSON", e))
            .and_then(|snapshot| ConversationState::from_snapshot(snapshot, capacity));

        match parsed {
            Ok(state) => {
                debug!(
                    path = %self.path.display(),
                    turns = state.turn_count(),
                    history = state.emotion_history().len(),
                    "conversation snapshot loaded"
                );
                state
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "discarding corrupt conversation snapshot");
                ConversationState::new(capacity)
            }
        }
    }

    /// Write `state` to a sibling temp file, then rename it into place.
    pub async fn save(&self, state: &ConversationState) -> Result<(), EmoraError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| snapshot_err("failed to create snapshot directory", e))?;
        }

        let json = serde_json::to_string_pretty(&state.to_snapshot())
            .map_err(|e| snapshot_err("failed to serialize snapshot", e))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| snapshot_err("failed to write snapshot", e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| snapshot_err("failed to replace snapshot", e))
    }

    /// Delete the snapshot file. A missing file is not an error.
    pub async fn remove(&self) -> Result<(), EmoraError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(snapshot_err("failed to remove snapshot", e)),
        }
    }
}
