// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a complete orchestrator with mock collaborators,
//! a temp SQLite database and temp snapshot/log files. Provides
//! `send_message()` to drive the full chat pipeline in tests.

use std::path::Path;
use std::sync::Arc;

use emora_agent::{ChatRequest, ChatResponse, Collaborators, Orchestrator};
use emora_config::EmoraConfig;
use emora_context::Persona;
use emora_core::EmoraError;
use emora_memory::SqliteMemoryStore;
use emora_storage::Database;

use crate::mock_classifier::MockClassifier;
use crate::mock_embedder::MockEmbedder;
use crate::mock_provider::MockProvider;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    classifier: Option<MockClassifier>,
    persona: Option<Persona>,
    config: EmoraConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            classifier: None,
            persona: None,
            config: EmoraConfig::default(),
        }
    }

    /// Set mock provider responses.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Use a custom classifier instead of the default keyword set.
    pub fn with_classifier(mut self, classifier: MockClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Use a custom persona.
    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = Some(persona);
        self
    }

    /// Start from a custom configuration. File paths are still redirected
    /// into the harness temp directory.
    pub fn with_config(mut self, config: EmoraConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, EmoraError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| EmoraError::Storage { source: e.into() })?;
        let path_in = |name: &str| temp_dir.path().join(name).to_string_lossy().to_string();

        let mut config = self.config;
        config.storage.database_path = path_in("memory.db");
        config.conversation.snapshot_path = path_in("conversation_state.json");
        config.conversation.memory_log_path = path_in("memory.jsonl");

        let database =
            Database::open(&config.storage.database_path, config.storage.wal_mode).await?;
        let store = Arc::new(SqliteMemoryStore::new(database));

        let mock_provider = Arc::new(MockProvider::with_responses(self.responses));
        let embedder = Arc::new(MockEmbedder::new());
        let classifier = Arc::new(self.classifier.unwrap_or_default());
        let persona = self.persona.unwrap_or_default();

        let harness = TestHarness {
            orchestrator: Arc::new(Orchestrator::new(
                Collaborators {
                    classifier: classifier.clone(),
                    embedder: embedder.clone(),
                    provider: mock_provider.clone(),
                    store: store.clone(),
                },
                &config,
                persona,
            )),
            mock_provider,
            embedder,
            classifier,
            store,
            config,
            _temp_dir: temp_dir,
        };
        Ok(harness)
    }
}

/// A complete test environment with mock collaborators and temp storage.
pub struct TestHarness {
    /// The orchestrator under test.
    pub orchestrator: Arc<Orchestrator>,
    /// The mock generation backend.
    pub mock_provider: Arc<MockProvider>,
    /// The deterministic embedder.
    pub embedder: Arc<MockEmbedder>,
    /// The keyword classifier.
    pub classifier: Arc<MockClassifier>,
    /// SQLite memory store (temp DB, cleaned up on drop).
    pub store: Arc<SqliteMemoryStore>,
    /// Configuration with all paths inside the temp directory.
    pub config: EmoraConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Send a message with default request options.
    pub async fn send_message(&self, text: &str) -> Result<ChatResponse, EmoraError> {
        self.orchestrator.chat(ChatRequest::new(text)).await
    }

    /// Directory holding the database, snapshot and memory log.
    pub fn data_dir(&self) -> &Path {
        self._temp_dir.path()
    }

    /// Build a second orchestrator over the same files and store, as a
    /// process restart would.
    pub fn restart(&self) -> Orchestrator {
        Orchestrator::new(
            Collaborators {
                classifier: self.classifier.clone(),
                embedder: self.embedder.clone(),
                provider: self.mock_provider.clone(),
                store: self.store.clone(),
            },
            &self.config,
            self.orchestrator.character().clone(),
        )
    }
}
