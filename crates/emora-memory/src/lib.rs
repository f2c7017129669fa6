// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emotion-aware long-term memory for the Emora companion.
//!
//! ## Architecture
//!
//! - **EmotionAffinityTable**: group-based similarity between emotion labels
//! - **MemoryStore**: nearest-neighbor store contract, with a SQLite implementation
//! - **RankingEngine**: semantic + emotional + recency hybrid re-ranking
//! - **MemoryRecorder**: embeds and persists completed exchanges
//! - **MemoryLog**: append-only JSON Lines audit trail of exchanges

pub mod affinity;
pub mod log;
pub mod recorder;
pub mod retriever;
pub mod store;
pub mod types;

pub use affinity::EmotionAffinityTable;
pub use log::{MemoryLog, MemoryLogEntry};
pub use recorder::MemoryRecorder;
pub use retriever::{RankingConfig, RankingEngine, RetrievalParams};
pub use store::{MemoryStore, SqliteMemoryStore};
pub use types::*;
