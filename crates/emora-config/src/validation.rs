// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty paths, weights in range, and positive window sizes.

use crate::diagnostic::ConfigError;
use crate::model::EmoraConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &EmoraConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }
    if config.conversation.snapshot_path.trim().is_empty() {
        fail("conversation.snapshot_path must not be empty".to_string());
    }
    if config.conversation.memory_log_path.trim().is_empty() {
        fail("conversation.memory_log_path must not be empty".to_string());
    }

    let retrieval = &config.retrieval;
    if retrieval.top_k == 0 {
        fail("retrieval.top_k must be at least 1".to_string());
    }
    if !(0.0..=1.0).contains(&retrieval.emotion_weight) {
        fail(format!(
            "retrieval.emotion_weight must be within 0.0-1.0, got {}",
            retrieval.emotion_weight
        ));
    }
    if retrieval.candidate_multiplier == 0 {
        fail("retrieval.candidate_multiplier must be at least 1".to_string());
    }
    if retrieval.min_candidates == 0 {
        fail("retrieval.min_candidates must be at least 1".to_string());
    }
    if retrieval.recency_half_life_hours.is_nan() || retrieval.recency_half_life_hours <= 0.0 {
        fail(format!(
            "retrieval.recency_half_life_hours must be positive, got {}",
            retrieval.recency_half_life_hours
        ));
    }
    if !(0.0..=1.0).contains(&retrieval.recency_weight) {
        fail(format!(
            "retrieval.recency_weight must be within 0.0-1.0, got {}",
            retrieval.recency_weight
        ));
    }

    if config.conversation.capacity == 0 {
        fail("conversation.capacity must be at least 1".to_string());
    }

    if !(0.0..=2.0).contains(&config.agent.temperature) {
        fail(format!(
            "agent.temperature must be within 0.0-2.0, got {}",
            config.agent.temperature
        ));
    }
    if config.agent.max_tokens == 0 {
        fail("agent.max_tokens must be at least 1".to_string());
    }

    if let Some(ref path) = config.persona.persona_file
        && path.trim().is_empty()
    {
        fail("persona.persona_file must not be empty when set".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
