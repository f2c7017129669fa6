// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory conversation state.

use std::collections::{HashMap, VecDeque};

use emora_core::EmoraError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::snapshot::Snapshot;

/// Default number of turns kept in the recent window.
pub const DEFAULT_CAPACITY: usize = 10;

/// Number of most recent emotions considered for the dominant emotion and
/// the emotional summary.
pub const DOMINANT_WINDOW: usize = 5;

/// Dominant emotion of an empty history.
pub const INITIAL_EMOTION: &str = "neutral";

/// Separator used when rendering an emotion sequence.
pub const JOURNEY_SEPARATOR: &str = " → ";

/// One completed request cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user_message: String,
    pub user_emotion: String,
    pub bot_response: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Most frequent label among the last [`DOMINANT_WINDOW`] entries of `history`.
///
/// Ties go to the tied label that appears first in the window. An empty
/// history is `"neutral"`.
pub fn dominant_emotion(history: &[String]) -> String {
    let window = &history[history.len().saturating_sub(DOMINANT_WINDOW)..];

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in window {
        *counts.entry(label.as_str()).or_insert(0) += 1;
    }
    let max = counts.values().copied().max().unwrap_or(0);

    window
        .iter()
        .find(|label| counts.get(label.as_str()) == Some(&max))
        .map_or_else(|| INITIAL_EMOTION.to_string(), String::clone)
}

/// Bounded recent-turn window plus unbounded emotion history.
///
/// Invariants: `emotion_history.len() >= recent_turns.len()`,
/// `recent_turns.len() <= capacity`, and `dominant_emotion` always equals
/// [`dominant_emotion`] of the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    capacity: usize,
    recent_turns: VecDeque<ConversationTurn>,
    emotion_history: Vec<String>,
    dominant_emotion: String,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ConversationState {
    /// Empty state keeping at most `capacity` turns (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            recent_turns: VecDeque::with_capacity(capacity),
            emotion_history: Vec::new(),
            dominant_emotion: INITIAL_EMOTION.to_string(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Recent turns, oldest first.
    pub fn recent_turns(&self) -> &VecDeque<ConversationTurn> {
        &self.recent_turns
    }

    pub fn emotion_history(&self) -> &[String] {
        &self.emotion_history
    }

    pub fn dominant_emotion(&self) -> &str {
        &self.dominant_emotion
    }

    /// Number of turns currently held in the recent window.
    pub fn turn_count(&self) -> usize {
        self.recent_turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emotion_history.is_empty()
    }

    /// Append a turn, evicting the oldest when full, and recompute the
    /// dominant emotion.
    pub fn record(&mut self, turn: ConversationTurn) {
        if self.recent_turns.len() == self.capacity {
            self.recent_turns.pop_front();
        }
        self.emotion_history.push(turn.user_emotion.clone());
        self.recent_turns.push_back(turn);
        self.dominant_emotion = dominant_emotion(&self.emotion_history);
    }

    /// The last `n` turns as alternating user/assistant lines, oldest first.
    ///
    /// Empty string when there are no turns.
    pub fn recent_context(&self, n: usize) -> String {
        let skip = self.recent_turns.len().saturating_sub(n);
        self.recent_turns
            .iter()
            .skip(skip)
            .flat_map(|turn| {
                [
                    format!("User ({}): {}", turn.user_emotion, turn.user_message),
                    format!("Assistant: {}", turn.bot_response),
                ]
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Up to the last [`DOMINANT_WINDOW`] emotions, oldest first.
    pub fn recent_emotions(&self) -> &[String] {
        let start = self.emotion_history.len().saturating_sub(DOMINANT_WINDOW);
        &self.emotion_history[start..]
    }

    /// The recent emotions joined with an arrow, or `None` before the first turn.
    pub fn emotional_journey(&self) -> Option<String> {
        if self.emotion_history.is_empty() {
            None
        } else {
            Some(self.recent_emotions().join(JOURNEY_SEPARATOR))
        }
    }

    /// Human-readable summary of the emotional arc.
    pub fn emotional_summary(&self) -> String {
        match self.emotional_journey() {
            None => "Beginning of conversation".to_string(),
            Some(journey) => format!(
                "Emotional journey: {journey}\nCurrent dominant emotion: {}",
                self.dominant_emotion
            ),
        }
    }

    /// Serializable copy of every field.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            turns: self.recent_turns.iter().cloned().collect(),
            dominant_emotion: self.dominant_emotion.clone(),
            emotion_history: self.emotion_history.clone(),
        }
    }

    /// Rebuild state from a snapshot.
    ///
    /// Turns beyond `capacity` are dropped oldest first. A snapshot whose
    /// history is shorter than its turn list is rejected. The dominant
    /// emotion is recomputed from the history.
    pub fn from_snapshot(snapshot: Snapshot, capacity: usize) -> Result<Self, EmoraError> {
        if snapshot.emotion_history.len() < snapshot.turns.len() {
            return Err(EmoraError::Snapshot {
                message: format!(
                    "emotion history ({}) is shorter than turn list ({})",
                    snapshot.emotion_history.len(),
                    snapshot.turns.len()
                ),
                source: None,
            });
        }

        let mut state = Self::new(capacity);
        let skip = snapshot.turns.len().saturating_sub(state.capacity);
        state.recent_turns.extend(snapshot.turns.into_iter().skip(skip));
        state.dominant_emotion = dominant_emotion(&snapshot.emotion_history);
        if state.dominant_emotion != snapshot.dominant_emotion {
            debug!(
                stored = %snapshot.dominant_emotion,
                recomputed = %state.dominant_emotion,
                "snapshot dominant emotion differs from its history"
            );
        }
        state.emotion_history = snapshot.emotion_history;
        Ok(state)
    }
}
