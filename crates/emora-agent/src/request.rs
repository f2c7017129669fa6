// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat request parameters.

use emora_core::EmoraError;
use serde::{Deserialize, Serialize};

fn default_emotion_weight() -> f64 {
    0.4
}

fn default_use_recent_context() -> bool {
    true
}

/// One user message plus per-request retrieval options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatRequest {
    /// The user's message. Must contain non-whitespace text.
    pub message: String,

    /// Weight of emotional similarity in retrieval, clamped to [0, 1].
    #[serde(default = "default_emotion_weight")]
    pub emotion_weight: f64,

    /// Whether recent turns are included in the prompt.
    #[serde(default = "default_use_recent_context")]
    pub use_recent_context: bool,
}

impl ChatRequest {
    /// A request with default options.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            emotion_weight: default_emotion_weight(),
            use_recent_context: default_use_recent_context(),
        }
    }

    pub fn with_emotion_weight(mut self, weight: f64) -> Self {
        self.emotion_weight = weight;
        self
    }

    pub fn with_recent_context(mut self, enabled: bool) -> Self {
        self.use_recent_context = enabled;
        self
    }

    /// Reject blank messages and NaN weights; clamp the weight into [0, 1].
    pub fn validate(mut self) -> Result<Self, EmoraError> {
        if self.message.trim().is_empty() {
            return Err(EmoraError::InvalidParameter(
                "message field is required".to_string(),
            ));
        }
        if self.emotion_weight.is_nan() {
            return Err(EmoraError::InvalidParameter(
                "emotion_weight must be a number".to_string(),
            ));
        }
        self.emotion_weight = self.emotion_weight.clamp(0.0, 1.0);
        Ok(self)
    }
}
