// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Write path: embed an utterance and persist it as a memory record.

use std::sync::Arc;

use emora_core::{EmbeddingAdapter, EmbeddingInput, EmoraError, Speaker};
use tracing::debug;

use crate::store::MemoryStore;
use crate::types::{now_millis, MemoryRecord};

/// Embeds utterances and appends them to a [`MemoryStore`].
pub struct MemoryRecorder {
    store: Arc<dyn MemoryStore>,
    embedder: Arc<dyn EmbeddingAdapter>,
}

impl MemoryRecorder {
    pub fn new(store: Arc<dyn MemoryStore>, embedder: Arc<dyn EmbeddingAdapter>) -> Self {
        Self { store, embedder }
    }

    /// Store `text` stamped with the current time. Returns the new record id.
    pub async fn record(
        &self,
        text: &str,
        emotion: &str,
        speaker: Speaker,
        reply: Option<String>,
    ) -> Result<String, EmoraError> {
        self.record_at(text, emotion, speaker, reply, now_millis())
            .await
    }

    /// Store `text` stamped with an explicit timestamp.
    pub async fn record_at(
        &self,
        text: &str,
        emotion: &str,
        speaker: Speaker,
        reply: Option<String>,
        timestamp_ms: i64,
    ) -> Result<String, EmoraError> {
        let output = self.embedder.embed(EmbeddingInput::single(text)).await?;
        let embedding = output
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmoraError::Embedding {
                message: "embedding returned no vectors".to_string(),
                source: None,
            })?;

        let record = MemoryRecord::new(text, embedding, emotion, speaker, timestamp_ms, reply);
        let id = record.id.clone();
        self.store.insert(record).await?;
        debug!(id = %id, emotion, %speaker, "memory recorded");
        Ok(id)
    }
}
