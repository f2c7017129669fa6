// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for text generation backends.

use async_trait::async_trait;

use crate::error::EmoraError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{GenerationOutcome, GenerationRequest};

/// Adapter for the reply generation backend.
///
/// A successful call may still carry a degraded outcome (blocked by policy,
/// truncated by length); transport and API failures are returned as `Err`.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a prompt and returns the typed generation outcome.
    async fn complete(&self, request: GenerationRequest) -> Result<GenerationOutcome, EmoraError>;
}
