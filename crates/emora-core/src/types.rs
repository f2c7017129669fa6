// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Emora workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A free-form, lower-case emotion label such as `"sadness"` or `"joy"`.
pub type EmotionLabel = String;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of collaborator behind an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Embedding,
    EmotionClassifier,
    Provider,
    Storage,
}

/// Who produced an utterance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    /// Texts to embed, in order.
    pub texts: Vec<String>,
}

impl EmbeddingInput {
    /// Convenience constructor for a single text.
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            texts: vec![text.into()],
        }
    }
}

/// Output from an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    /// One vector per input text, in input order.
    pub embeddings: Vec<Vec<f32>>,
    /// Dimensionality shared by every vector.
    pub dimensions: usize,
}

/// A request to the reply generation backend.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Fully assembled prompt text.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
}

/// Why a generation backend refused to produce a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// The prompt itself was rejected before generation.
    Prompt,
    /// The candidate reply tripped a safety filter.
    Safety,
    /// The candidate reply was withheld as recitation of training data.
    Recitation,
}

/// Typed result of a generation call that reached the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Generation finished normally.
    Completed(String),
    /// Generation hit the length limit; any partial text is carried along.
    Truncated { partial: Option<String> },
    /// Generation was blocked by a content policy.
    Blocked(BlockReason),
}

impl GenerationOutcome {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationOutcome::Completed(_) => "completed",
            GenerationOutcome::Truncated { .. } => "truncated",
            GenerationOutcome::Blocked(BlockReason::Prompt) => "blocked_prompt",
            GenerationOutcome::Blocked(BlockReason::Safety) => "blocked_safety",
            GenerationOutcome::Blocked(BlockReason::Recitation) => "blocked_recitation",
        }
    }
}
