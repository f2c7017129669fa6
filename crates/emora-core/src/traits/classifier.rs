// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emotion classifier trait.

use async_trait::async_trait;

use crate::error::EmoraError;
use crate::traits::adapter::PluginAdapter;
use crate::types::EmotionLabel;

/// Adapter that labels raw user text with a single emotion.
///
/// Labels are free-form; the affinity table downstream tolerates labels
/// it has never seen.
#[async_trait]
pub trait EmotionClassifier: PluginAdapter {
    /// Returns the dominant emotion label for `text`.
    async fn classify(&self, text: &str) -> Result<EmotionLabel, EmoraError>;
}
