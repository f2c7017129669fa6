// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Emora integration tests.
//!
//! Provides mock collaborators and a test harness for fast, deterministic,
//! CI-runnable tests without model downloads or network access.
//!
//! # Components
//!
//! - [`MockProvider`] - Generation backend with scripted outcomes
//! - [`MockEmbedder`] - Deterministic bag-of-words embeddings
//! - [`MockClassifier`] - Keyword-driven emotion labels
//! - [`TestHarness`] - Orchestrator wired to temp storage and the mocks

pub mod harness;
pub mod mock_classifier;
pub mod mock_embedder;
pub mod mock_provider;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_classifier::MockClassifier;
pub use mock_embedder::MockEmbedder;
pub use mock_provider::MockProvider;
