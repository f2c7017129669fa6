// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation backend for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with scripted outcomes,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use emora_core::types::{AdapterType, GenerationOutcome, GenerationRequest, HealthStatus};
use emora_core::{EmoraError, PluginAdapter, ProviderAdapter};

/// One scripted provider result.
#[derive(Debug, Clone)]
enum Scripted {
    Outcome(GenerationOutcome),
    Failure(String),
}

/// A mock provider that returns pre-configured outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty,
/// a completed "mock response" is returned. Every prompt received is kept
/// for later inspection.
pub struct MockProvider {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty queue.
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider pre-loaded with completed replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        let script = responses
            .into_iter()
            .map(|text| Scripted::Outcome(GenerationOutcome::Completed(text)))
            .collect();
        Self {
            script: Arc::new(Mutex::new(script)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a completed reply.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.add_outcome(GenerationOutcome::Completed(text.into()))
            .await;
    }

    /// Queue an arbitrary outcome (blocked, truncated, ...).
    pub async fn add_outcome(&self, outcome: GenerationOutcome) {
        self.script.lock().await.push_back(Scripted::Outcome(outcome));
    }

    /// Queue a provider failure.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(Scripted::Failure(message.into()));
    }

    /// Prompts received so far, in call order.
    pub async fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .await
            .iter()
            .map(|r| r.prompt.clone())
            .collect()
    }

    /// The most recent request, if any.
    pub async fn last_request(&self) -> Option<GenerationRequest> {
        self.requests.lock().await.last().cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, EmoraError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EmoraError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: GenerationRequest) -> Result<GenerationOutcome, EmoraError> {
        self.requests.lock().await.push(request);
        let next = self.script.lock().await.pop_front();
        match next {
            Some(Scripted::Outcome(outcome)) => Ok(outcome),
            Some(Scripted::Failure(message)) => Err(EmoraError::Provider {
                message,
                source: None,
            }),
            None => Ok(GenerationOutcome::Completed("mock response".to_string())),
        }
    }
}
