// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide conversation state handle.
//!
//! The state is loaded from the snapshot on first access. Every mutation
//! (record, reset) runs as one critical section: lock, mutate, persist,
//! unlock. Concurrent callers therefore never lose updates.

use emora_core::EmoraError;
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tracing::info;

use crate::snapshot::SnapshotStore;
use crate::state::{ConversationState, ConversationTurn};

/// Shared, lazily loaded, lock-protected conversation state.
pub struct ConversationTracker {
    state: Mutex<Option<ConversationState>>,
    store: SnapshotStore,
    capacity: usize,
}

impl ConversationTracker {
    /// Create a tracker. Nothing is read from disk until first use.
    pub fn new(store: SnapshotStore, capacity: usize) -> Self {
        Self {
            state: Mutex::new(None),
            store,
            capacity,
        }
    }

    pub fn snapshot_store(&self) -> &SnapshotStore {
        &self.store
    }

    async fn lock_loaded(&self) -> MappedMutexGuard<'_, ConversationState> {
        let mut guard = self.state.lock().await;
        if guard.is_none() {
            *guard = Some(self.store.load(self.capacity).await);
        }
        let capacity = self.capacity;
        MutexGuard::map(guard, |slot| {
            slot.get_or_insert_with(|| ConversationState::new(capacity))
        })
    }

    /// Record a completed turn and persist the new state.
    ///
    /// The in-memory state is updated even when persistence fails; the
    /// persistence error is returned so the caller can decide how loudly to
    /// report it.
    pub async fn record(&self, turn: ConversationTurn) -> Result<(), EmoraError> {
        let mut state = self.lock_loaded().await;
        state.record(turn);
        self.store.save(&state).await
    }

    /// Run `f` against the current state while holding the lock.
    pub async fn read<R>(&self, f: impl FnOnce(&ConversationState) -> R) -> R {
        let state = self.lock_loaded().await;
        f(&state)
    }

    /// Clone of the current state.
    pub async fn current(&self) -> ConversationState {
        self.read(ConversationState::clone).await
    }

    /// Return to the initial empty state and delete the snapshot.
    pub async fn reset(&self) -> Result<(), EmoraError> {
        let mut guard = self.state.lock().await;
        *guard = Some(ConversationState::new(self.capacity));
        self.store.remove().await?;
        info!(path = %self.store.path().display(), "conversation state reset");
        Ok(())
    }
}
