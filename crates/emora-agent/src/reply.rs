// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from generation results to the reply shown to the user.
//!
//! Every way generation can end has its own outcome and, where there is no
//! usable text, its own fallback message. The user always gets a reply.

use emora_core::{BlockReason, EmoraError, GenerationOutcome};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::warn;

pub const BLOCKED_PROMPT_REPLY: &str =
    "I want to respond thoughtfully to what you've shared. Could you tell me more in a different way?";

pub const BLOCKED_SAFETY_REPLY: &str = "I hear what you're sharing. Let me respond in a supportive way - could you share more about what you're feeling right now?";

pub const BLOCKED_RECITATION_REPLY: &str =
    "I'd like to give you an original, thoughtful response. Could you rephrase what you shared?";

pub const EMPTY_REPLY: &str =
    "I'm here to support you. Could you tell me more about what you're experiencing?";

pub const ERROR_REPLY: &str = "I'm experiencing a technical difficulty, but I'm still here for you. Let's try continuing our conversation.";

/// How the reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReplyOutcome {
    /// Generated text, used as-is.
    Completed,
    /// Partial text from a length-limited generation.
    Truncated,
    /// Generation produced no usable text.
    Empty,
    BlockedPrompt,
    BlockedSafety,
    BlockedRecitation,
    /// The generation backend failed.
    Error,
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Turn a generation result into the user-facing reply and its outcome.
pub fn resolve_reply(result: Result<GenerationOutcome, EmoraError>) -> (String, ReplyOutcome) {
    match result {
        Ok(GenerationOutcome::Completed(text)) => match non_empty(&text) {
            Some(text) => (text, ReplyOutcome::Completed),
            None => (EMPTY_REPLY.to_string(), ReplyOutcome::Empty),
        },
        Ok(GenerationOutcome::Truncated { partial }) => {
            match partial.as_deref().and_then(non_empty) {
                Some(text) => (text, ReplyOutcome::Truncated),
                None => (EMPTY_REPLY.to_string(), ReplyOutcome::Empty),
            }
        }
        Ok(GenerationOutcome::Blocked(reason)) => {
            warn!(reason = %reason, "generation blocked by content policy");
            match reason {
                BlockReason::Prompt => (BLOCKED_PROMPT_REPLY.to_string(), ReplyOutcome::BlockedPrompt),
                BlockReason::Safety => (BLOCKED_SAFETY_REPLY.to_string(), ReplyOutcome::BlockedSafety),
                BlockReason::Recitation => (
                    BLOCKED_RECITATION_REPLY.to_string(),
                    ReplyOutcome::BlockedRecitation,
                ),
            }
        }
        Err(e) => {
            warn!(error = %e, "generation failed, using fallback reply");
            (ERROR_REPLY.to_string(), ReplyOutcome::Error)
        }
    }
}
