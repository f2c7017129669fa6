// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state tracking for emotional continuity.
//!
//! [`ConversationState`] keeps a bounded window of recent turns, the full
//! emotion history and the derived dominant emotion. [`ConversationTracker`]
//! is the shared, lock-protected handle that lazily loads the state from a
//! [`SnapshotStore`] and writes it back after every recorded turn.

pub mod snapshot;
pub mod state;
pub mod tracker;

pub use snapshot::{Snapshot, SnapshotStore};
pub use state::{dominant_emotion, ConversationState, ConversationTurn};
pub use tracker::ConversationTracker;
