// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `emora recall` command implementation.
//!
//! Reads the memory store directly; no embedding model is needed to count
//! prior occurrences of an emotion.

use emora_config::EmoraConfig;
use emora_core::EmoraError;
use emora_memory::retriever::emotional_history_message;
use emora_memory::{MemoryStore, MetadataFilter, SqliteMemoryStore};
use emora_storage::Database;
use tracing::debug;

/// Emotional-history summary for `emotion` from the configured database.
pub async fn recall_summary(
    config: &EmoraConfig,
    emotion: &str,
    top_k: usize,
) -> Result<String, EmoraError> {
    if top_k == 0 {
        return Err(EmoraError::InvalidParameter(
            "top_k must be at least 1".to_string(),
        ));
    }
    let emotion = emotion.trim().to_lowercase();
    if emotion.is_empty() {
        return Err(EmoraError::InvalidParameter(
            "emotion must not be empty".to_string(),
        ));
    }

    let database =
        Database::open(&config.storage.database_path, config.storage.wal_mode).await?;
    let store = SqliteMemoryStore::new(database);
    let matches = store
        .find_by_metadata(&MetadataFilter::emotion(&emotion), top_k)
        .await?;
    debug!(emotion = %emotion, matched = matches.len(), "recall lookup");

    Ok(emotional_history_message(&emotion, matches.len()))
}

#[cfg(test)]
mod tests {
    use emora_core::Speaker;
    use emora_memory::MemoryRecord;

    use super::*;

    fn config_in(dir: &tempfile::TempDir) -> EmoraConfig {
        let mut config = EmoraConfig::default();
        config.storage.database_path = dir.path().join("memory.db").to_string_lossy().to_string();
        config
    }

    #[tokio::test]
    async fn empty_database_is_a_first_time() {
        let dir = tempfile::tempdir().unwrap();
        let summary = recall_summary(&config_in(&dir), "Joy", 3).await.unwrap();
        assert_eq!(summary, "This is the first time we're exploring joy together.");
    }

    #[tokio::test]
    async fn counts_are_capped_at_top_k() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let store = SqliteMemoryStore::new(
            Database::open(&config.storage.database_path, true).await.unwrap(),
        );
        for i in 0..4 {
            let record = MemoryRecord::new(
                format!("memory {i}"),
                vec![1.0, 0.0],
                "sadness",
                Speaker::User,
                i,
                None,
            );
            store.insert(record).await.unwrap();
        }

        assert_eq!(
            recall_summary(&config, "sadness", 10).await.unwrap(),
            "We've discussed sadness 4 time(s) before in our conversation."
        );
        assert_eq!(
            recall_summary(&config, "sadness", 2).await.unwrap(),
            "We've discussed sadness 2 time(s) before in our conversation."
        );
    }

    #[tokio::test]
    async fn zero_top_k_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = recall_summary(&config_in(&dir), "joy", 0).await.unwrap_err();
        assert!(matches!(err, EmoraError::InvalidParameter(_)));
    }
}
