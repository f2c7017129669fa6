// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `emora state` and `emora reset` command implementations.

use emora_agent::ConversationView;
use emora_config::EmoraConfig;
use emora_conversation::{ConversationTracker, SnapshotStore};
use emora_core::EmoraError;
use tracing::info;

/// Load the persisted conversation as a view. A missing or corrupt
/// snapshot yields the initial state.
pub async fn load_view(config: &EmoraConfig) -> ConversationView {
    let store = SnapshotStore::new(&config.conversation.snapshot_path);
    let state = store.load(config.conversation.capacity).await;
    ConversationView::from_state(&state)
}

/// Plain-text rendering of a conversation view.
pub fn render_view(view: &ConversationView) -> String {
    let mut out = format!(
        "Turns: {}\nDominant emotion: {}\n{}\n",
        view.turn_count, view.dominant_emotion, view.emotional_summary
    );
    if !view.recent_context.is_empty() {
        out.push_str("\nRecent conversation:\n");
        out.push_str(&view.recent_context);
        out.push('\n');
    }
    out
}

/// Run the `emora state` command.
pub async fn run_state(config: &EmoraConfig, json: bool) -> Result<(), EmoraError> {
    let view = load_view(config).await;
    if json {
        let rendered = serde_json::to_string_pretty(&view)
            .map_err(|e| EmoraError::Internal(format!("failed to serialize state: {e}")))?;
        println!("{rendered}");
    } else {
        print!("{}", render_view(&view));
    }
    Ok(())
}

/// Run the `emora reset` command.
pub async fn run_reset(config: &EmoraConfig) -> Result<(), EmoraError> {
    let tracker = ConversationTracker::new(
        SnapshotStore::new(&config.conversation.snapshot_path),
        config.conversation.capacity,
    );
    tracker.reset().await?;
    info!(path = %config.conversation.snapshot_path, "conversation state reset");
    println!("Conversation state reset.");
    Ok(())
}
