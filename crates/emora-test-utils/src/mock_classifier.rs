// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword-driven emotion classifier for tests.

use async_trait::async_trait;

use emora_core::types::{AdapterType, EmotionLabel, HealthStatus};
use emora_core::{EmoraError, EmotionClassifier, PluginAdapter};

/// Returns the label of the first keyword found in the text, or `"neutral"`.
pub struct MockClassifier {
    keywords: Vec<(String, String)>,
}

impl MockClassifier {
    /// A classifier with a small built-in vocabulary.
    pub fn new() -> Self {
        Self::empty()
            .with_keyword("happy", "joy")
            .with_keyword("great", "joy")
            .with_keyword("sad", "sadness")
            .with_keyword("sick", "sadness")
            .with_keyword("angry", "anger")
            .with_keyword("scared", "fear")
            .with_keyword("worried", "fear")
            .with_keyword("wow", "surprise")
    }

    /// A classifier that labels everything `"neutral"` until keywords are added.
    pub fn empty() -> Self {
        Self { keywords: vec![] }
    }

    /// Map a (case-insensitive) keyword to a label. Earlier keywords win.
    pub fn with_keyword(mut self, keyword: &str, label: &str) -> Self {
        self.keywords
            .push((keyword.to_lowercase(), label.to_string()));
        self
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockClassifier {
    fn name(&self) -> &str {
        "mock-classifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::EmotionClassifier
    }

    async fn health_check(&self) -> Result<HealthStatus, EmoraError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EmoraError> {
        Ok(())
    }
}

#[async_trait]
impl EmotionClassifier for MockClassifier {
    async fn classify(&self, text: &str) -> Result<EmotionLabel, EmoraError> {
        let lowered = text.to_lowercase();
        let label = self
            .keywords
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword.as_str()))
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| "neutral".to_string());
        Ok(label)
    }
}
