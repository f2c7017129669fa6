// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation orchestrator for the Emora companion.
//!
//! Wires emotion detection, emotion-aware memory retrieval, reply
//! generation and state persistence into a single `chat` call.

pub mod metrics;
pub mod orchestrator;
pub mod reply;
pub mod request;

pub use orchestrator::{
    ChatResponse, Collaborators, ConversationStats, ConversationView, Orchestrator,
};
pub use reply::{resolve_reply, ReplyOutcome};
pub use request::ChatRequest;
