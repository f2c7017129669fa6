// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Emora companion.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Emora configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmoraConfig {
    /// Agent identity and generation settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Hybrid retrieval settings.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Conversation state tracking settings.
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Character persona settings.
    #[serde(default)]
    pub persona: PersonaConfig,
}

/// Agent identity and generation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent process.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Number of recent turns rendered into the prompt.
    #[serde(default = "default_recent_context_turns")]
    pub recent_context_turns: usize,

    /// Record cap used when summarizing prior occurrences of an emotion.
    #[serde(default = "default_summary_top_k")]
    pub summary_top_k: usize,

    /// Sampling temperature passed to the generation backend.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum reply length in tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            recent_context_turns: default_recent_context_turns(),
            summary_top_k: default_summary_top_k(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_agent_name() -> String {
    "emora".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_recent_context_turns() -> usize {
    3
}

fn default_summary_top_k() -> usize {
    3
}

fn default_temperature() -> f32 {
    0.8
}

fn default_max_tokens() -> u32 {
    1500
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database holding embedded memory records.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

/// Base directory for all Emora data files.
fn data_dir() -> std::path::PathBuf {
    dirs::data_dir()
        .map(|p| p.join("emora"))
        .unwrap_or_else(|| std::path::PathBuf::from("data"))
}

fn default_database_path() -> String {
    data_dir().join("emora.db").display().to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Hybrid retrieval configuration.
///
/// Candidates are over-fetched from the vector store and re-ranked by
/// `(1 - w) * semantic + w * emotional + recency_weight * recency`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Number of context entries returned per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Default weight of emotional affinity (0.0-1.0) when a request omits it.
    #[serde(default = "default_emotion_weight")]
    pub emotion_weight: f64,

    /// Apply the recency decay term.
    #[serde(default = "default_include_recency")]
    pub include_recency: bool,

    /// Candidates fetched per requested result.
    #[serde(default = "default_candidate_multiplier")]
    pub candidate_multiplier: usize,

    /// Lower bound on fetched candidates.
    #[serde(default = "default_min_candidates")]
    pub min_candidates: usize,

    /// Hours after which the recency score halves.
    #[serde(default = "default_recency_half_life_hours")]
    pub recency_half_life_hours: f64,

    /// Coefficient of the recency term in the combined score.
    #[serde(default = "default_recency_weight")]
    pub recency_weight: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            emotion_weight: default_emotion_weight(),
            include_recency: default_include_recency(),
            candidate_multiplier: default_candidate_multiplier(),
            min_candidates: default_min_candidates(),
            recency_half_life_hours: default_recency_half_life_hours(),
            recency_weight: default_recency_weight(),
        }
    }
}

fn default_top_k() -> usize {
    5
}

fn default_emotion_weight() -> f64 {
    0.4
}

fn default_include_recency() -> bool {
    true
}

fn default_candidate_multiplier() -> usize {
    2
}

fn default_min_candidates() -> usize {
    10
}

fn default_recency_half_life_hours() -> f64 {
    1.0
}

fn default_recency_weight() -> f64 {
    0.1
}

/// Conversation state tracking configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConversationConfig {
    /// Maximum number of turns kept in the recent window.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Path of the persisted conversation snapshot (JSON).
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,

    /// Path of the append-only audit log of completed exchanges (JSON Lines).
    #[serde(default = "default_memory_log_path")]
    pub memory_log_path: String,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            snapshot_path: default_snapshot_path(),
            memory_log_path: default_memory_log_path(),
        }
    }
}

fn default_capacity() -> usize {
    10
}

fn default_snapshot_path() -> String {
    data_dir().join("conversation_state.json").display().to_string()
}

fn default_memory_log_path() -> String {
    data_dir().join("memory.jsonl").display().to_string()
}

/// Character persona configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PersonaConfig {
    /// Path to a JSON persona definition. The built-in persona is used when unset.
    #[serde(default)]
    pub persona_file: Option<String>,
}
