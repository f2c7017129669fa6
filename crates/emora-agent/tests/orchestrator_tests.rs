// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end chat turns through the orchestrator with mock collaborators.

use emora_agent::reply::{BLOCKED_SAFETY_REPLY, ERROR_REPLY};
use emora_agent::{ChatRequest, ReplyOutcome};
use emora_core::{BlockReason, EmoraError, GenerationOutcome};
use emora_memory::MemoryStore;
use emora_test_utils::{MockClassifier, TestHarness};

#[tokio::test]
async fn first_turn_returns_reply_and_stats() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec!["I'm so sorry about your dog.".to_string()])
        .build()
        .await
        .unwrap();

    let response = harness.send_message("My dog is sick").await.unwrap();

    assert_eq!(response.reply, "I'm so sorry about your dog.");
    assert_eq!(response.outcome, ReplyOutcome::Completed);
    assert_eq!(response.user_emotion, "sadness");
    assert!(response.retrieved_context.is_empty());
    assert_eq!(response.character, "Aria");
    assert_eq!(response.conversation_stats.turn_count, 1);
    assert_eq!(response.conversation_stats.dominant_emotion, "sadness");
    assert_eq!(response.conversation_stats.emotional_journey, "sadness");
    // The turn is stored before the summary is computed.
    assert_eq!(
        response.emotional_summary.as_deref(),
        Some("We've discussed sadness 1 time(s) before in our conversation.")
    );
}

#[tokio::test]
async fn later_turns_see_earlier_memories_and_history() {
    let harness = TestHarness::builder().build().await.unwrap();

    harness.send_message("My dog is sick").await.unwrap();
    let second = harness.send_message("My dog is still sick").await.unwrap();

    assert_eq!(second.retrieved_context, vec!["My dog is sick".to_string()]);
    assert_eq!(second.conversation_stats.turn_count, 2);
    assert_eq!(
        second.conversation_stats.emotional_journey,
        "sadness → sadness"
    );

    let prompts = harness.mock_provider.prompts().await;
    assert_eq!(prompts.len(), 2);
    assert!(!prompts[0].contains("# RECENT CONVERSATION"));
    assert!(prompts[1].contains("# RECENT CONVERSATION"));
    assert!(prompts[1].contains("User (sadness): My dog is sick"));
    assert!(prompts[1].contains("Assistant: mock response"));
    assert!(prompts[1].trim_end().ends_with("Aria:"));
}

#[tokio::test]
async fn recent_context_can_be_disabled() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.send_message("hello").await.unwrap();

    harness
        .orchestrator
        .chat(ChatRequest::new("hello again").with_recent_context(false))
        .await
        .unwrap();

    let prompts = harness.mock_provider.prompts().await;
    assert!(!prompts[1].contains("# RECENT CONVERSATION"));
}

#[tokio::test]
async fn generation_settings_come_from_config() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.send_message("hello").await.unwrap();

    let request = harness.mock_provider.last_request().await.unwrap();
    assert_eq!(request.max_tokens, harness.config.agent.max_tokens);
    assert!((request.temperature - harness.config.agent.temperature).abs() < f32::EPSILON);
}

#[tokio::test]
async fn blocked_generation_uses_fallback_and_is_still_recorded() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness
        .mock_provider
        .add_outcome(GenerationOutcome::Blocked(BlockReason::Safety))
        .await;

    let response = harness.send_message("I am so angry").await.unwrap();

    assert_eq!(response.reply, BLOCKED_SAFETY_REPLY);
    assert_eq!(response.outcome, ReplyOutcome::BlockedSafety);
    assert_eq!(response.conversation_stats.turn_count, 1);
    assert_eq!(harness.store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn provider_failure_still_produces_a_reply() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.mock_provider.add_failure("service unavailable").await;

    let response = harness.send_message("hello").await.unwrap();

    assert_eq!(response.reply, ERROR_REPLY);
    assert_eq!(response.outcome, ReplyOutcome::Error);
}

#[tokio::test]
async fn embedding_failure_degrades_to_empty_context() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.send_message("My dog is sick").await.unwrap();
    harness.embedder.set_failing(true);

    let response = harness.send_message("My dog is sick").await.unwrap();

    assert!(response.retrieved_context.is_empty());
    assert_eq!(response.reply, "mock response");
    // The memory write needs an embedding too, so only the first turn is stored.
    assert_eq!(harness.store.count().await.unwrap(), 1);
    assert_eq!(response.conversation_stats.turn_count, 2);
}

#[tokio::test]
async fn blank_message_is_rejected_without_side_effects() {
    let harness = TestHarness::builder().build().await.unwrap();

    let err = harness.send_message("   ").await.unwrap_err();

    assert!(matches!(err, EmoraError::InvalidParameter(_)));
    assert!(harness.mock_provider.prompts().await.is_empty());
    assert_eq!(harness.store.count().await.unwrap(), 0);
    assert_eq!(harness.orchestrator.conversation_state().await.turn_count, 0);
}

#[tokio::test]
async fn emotion_weight_is_clamped() {
    let harness = TestHarness::builder().build().await.unwrap();
    let response = harness
        .orchestrator
        .chat(ChatRequest::new("hello").with_emotion_weight(7.5))
        .await
        .unwrap();
    assert_eq!(response.outcome, ReplyOutcome::Completed);
}

#[tokio::test]
async fn classifier_labels_are_normalized() {
    let harness = TestHarness::builder()
        .with_classifier(MockClassifier::empty().with_keyword("exam", "  Fear "))
        .build()
        .await
        .unwrap();

    let response = harness.send_message("I have an exam tomorrow").await.unwrap();
    assert_eq!(response.user_emotion, "fear");

    let neutral = harness.send_message("nothing special").await.unwrap();
    assert_eq!(neutral.user_emotion, "neutral");
}

#[tokio::test]
async fn conversation_state_view_reflects_turns() {
    let harness = TestHarness::builder().build().await.unwrap();
    let empty = harness.orchestrator.conversation_state().await;
    assert_eq!(empty.turn_count, 0);
    assert_eq!(empty.dominant_emotion, "neutral");
    assert_eq!(empty.emotional_summary, "Beginning of conversation");
    assert!(empty.recent_context.is_empty());

    harness.send_message("I feel happy").await.unwrap();
    harness.send_message("my dog is sick").await.unwrap();
    harness.send_message("still sad").await.unwrap();

    let view = harness.orchestrator.conversation_state().await;
    assert_eq!(view.turn_count, 3);
    assert_eq!(view.emotion_history, vec!["joy", "sadness", "sadness"]);
    assert_eq!(view.dominant_emotion, "sadness");
    assert!(view.emotional_summary.contains("joy → sadness → sadness"));
    assert!(view.recent_context.starts_with("User (joy): I feel happy"));
}

#[tokio::test]
async fn reset_clears_conversation_but_keeps_memories() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.send_message("My dog is sick").await.unwrap();

    harness.orchestrator.reset_conversation().await.unwrap();

    let view = harness.orchestrator.conversation_state().await;
    assert_eq!(view.turn_count, 0);
    assert_eq!(harness.store.count().await.unwrap(), 1);

    let response = harness.send_message("My dog is sick").await.unwrap();
    assert_eq!(response.conversation_stats.turn_count, 1);
    assert_eq!(response.retrieved_context, vec!["My dog is sick".to_string()]);
}

#[tokio::test]
async fn conversation_survives_restart() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.send_message("I feel happy").await.unwrap();
    harness.send_message("I feel great").await.unwrap();

    let restarted = harness.restart();
    let view = restarted.conversation_state().await;

    assert_eq!(view.turn_count, 2);
    assert_eq!(view.emotion_history, vec!["joy", "joy"]);
    assert_eq!(view.dominant_emotion, "joy");
}

#[tokio::test]
async fn exchanges_are_appended_to_memory_log() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec!["first reply".into(), "second reply".into()])
        .build()
        .await
        .unwrap();
    harness.send_message("I feel happy").await.unwrap();
    harness.send_message("I am worried").await.unwrap();

    let entries = harness.orchestrator.memory_log().load().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].user_text, "I feel happy");
    assert_eq!(entries[0].bot_reply, "first reply");
    assert_eq!(entries[1].user_emotion, "fear");
}

#[tokio::test]
async fn recall_reports_prior_occurrences() {
    let harness = TestHarness::builder().build().await.unwrap();
    assert_eq!(
        harness.orchestrator.recall("joy", 3).await.unwrap(),
        "This is the first time we're exploring joy together."
    );

    for _ in 0..4 {
        harness.send_message("I feel happy").await.unwrap();
    }
    assert_eq!(
        harness.orchestrator.recall("joy", 3).await.unwrap(),
        "We've discussed joy 3 time(s) before in our conversation."
    );
    assert!(matches!(
        harness.orchestrator.recall("joy", 0).await,
        Err(EmoraError::InvalidParameter(_))
    ));
}

#[tokio::test]
async fn chat_response_serializes_with_snake_case_outcome() {
    let harness = TestHarness::builder().build().await.unwrap();
    let response = harness.send_message("hello").await.unwrap();

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["outcome"], "completed");
    assert_eq!(json["conversation_stats"]["turn_count"], 1);
    assert_eq!(json["user_emotion"], "neutral");
}
