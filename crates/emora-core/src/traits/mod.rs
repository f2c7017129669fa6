// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the external collaborators.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod classifier;
pub mod embedding;
pub mod provider;

pub use adapter::PluginAdapter;
pub use classifier::EmotionClassifier;
pub use embedding::EmbeddingAdapter;
pub use provider::ProviderAdapter;
