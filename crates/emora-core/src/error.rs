// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Emora companion.

use thiserror::Error;

/// The primary error type used across all Emora adapter traits and core operations.
#[derive(Debug, Error)]
pub enum EmoraError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Embedding model errors (inference failure, empty output).
    #[error("embedding error: {message}")]
    Embedding {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Emotion classifier errors.
    #[error("emotion classification error: {message}")]
    Classification {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Text generation provider errors (API failure, network, model not found).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A caller-supplied parameter was rejected before any collaborator call.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Conversation snapshot could not be written or removed.
    #[error("snapshot error: {message}")]
    Snapshot {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Requested adapter was not found in the registry.
    #[error("adapter not found: {adapter_type}/{name}")]
    AdapterNotFound { adapter_type: String, name: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EmoraError {
    /// Whether this error came from an external collaborator and may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            EmoraError::Storage { .. }
                | EmoraError::Embedding { .. }
                | EmoraError::Classification { .. }
                | EmoraError::Provider { .. }
                | EmoraError::Timeout { .. }
        )
    }
}
