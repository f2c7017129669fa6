// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only JSON Lines audit log of completed exchanges.
//!
//! Independent of the vector store; one `{user_text, user_emotion, bot_reply}`
//! object per line.

use std::path::{Path, PathBuf};

use emora_core::EmoraError;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// One logged exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryLogEntry {
    pub user_text: String,
    pub user_emotion: String,
    pub bot_reply: String,
}

/// File-backed audit log.
#[derive(Debug, Clone)]
pub struct MemoryLog {
    path: PathBuf,
}

fn io_err(e: std::io::Error) -> EmoraError {
    EmoraError::Storage {
        source: Box::new(e),
    }
}

impl MemoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, creating the file and its parent directories if needed.
    pub async fn append(&self, entry: &MemoryLogEntry) -> Result<(), EmoraError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let mut line = serde_json::to_string(entry).map_err(|e| EmoraError::Storage {
            source: Box::new(e),
        })?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(io_err)?;
        file.write_all(line.as_bytes()).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)
    }

    /// Read every entry. A missing file is an empty log; malformed lines are
    /// skipped with a warning.
    pub async fn load(&self) -> Result<Vec<MemoryLogEntry>, EmoraError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(io_err(e)),
        };

        let entries = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(idx, line)| match serde_json::from_str(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        line = idx + 1,
                        error = %e,
                        "skipping malformed memory log line"
                    );
                    None
                }
            })
            .collect();
        Ok(entries)
    }
}
