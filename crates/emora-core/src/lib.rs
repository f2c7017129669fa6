// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Emora emotional companion.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Emora workspace. The external
//! collaborators (embedding model, emotion classifier, text generator) are
//! all reached through the adapter traits defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::EmoraError;
pub use types::{
    AdapterType, BlockReason, EmbeddingInput, EmbeddingOutput, EmotionLabel, GenerationOutcome,
    GenerationRequest, HealthStatus, Speaker,
};

pub use traits::{EmbeddingAdapter, EmotionClassifier, PluginAdapter, ProviderAdapter};
