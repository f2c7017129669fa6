// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete Emora pipeline.
//!
//! Each test creates an isolated TestHarness with temp SQLite, temp snapshot
//! and log files, and mock collaborators. The CLI tests run the compiled
//! binary against the harness files.

use std::process::Command;

use emora_config::EmoraConfig;
use emora_context::Persona;
use emora_test_utils::TestHarness;

// ---- Multi-turn journeys ----

#[tokio::test]
async fn emotional_journey_shows_last_five_emotions() {
    let harness = TestHarness::builder().build().await.unwrap();
    for message in [
        "I feel happy",
        "my dog is sick",
        "I am angry",
        "I am scared",
        "wow really",
        "I feel sad",
    ] {
        harness.send_message(message).await.unwrap();
    }

    let view = harness.orchestrator.conversation_state().await;
    assert_eq!(view.turn_count, 6);
    assert_eq!(view.emotion_history.len(), 6);
    // Last five: sadness, anger, fear, surprise, sadness.
    assert_eq!(view.dominant_emotion, "sadness");

    let last = harness.send_message("nothing much").await.unwrap();
    assert_eq!(
        last.conversation_stats.emotional_journey,
        "anger → fear → surprise → sadness → neutral"
    );
}

#[tokio::test]
async fn recent_turns_are_capped_but_history_is_not() {
    let mut config = EmoraConfig::default();
    config.conversation.capacity = 3;
    let harness = TestHarness::builder().with_config(config).build().await.unwrap();

    for i in 0..5 {
        harness
            .send_message(&format!("message number {i}"))
            .await
            .unwrap();
    }

    let view = harness.orchestrator.conversation_state().await;
    assert_eq!(view.turn_count, 3);
    assert_eq!(view.emotion_history.len(), 5);
    assert!(view.recent_context.starts_with("User (neutral): message number 2"));
}

#[tokio::test]
async fn retrieval_is_limited_to_top_k() {
    let mut config = EmoraConfig::default();
    config.retrieval.top_k = 2;
    let harness = TestHarness::builder().with_config(config).build().await.unwrap();

    for i in 0..4 {
        harness
            .send_message(&format!("my dog is sick day {i}"))
            .await
            .unwrap();
    }
    let response = harness.send_message("my dog is sick").await.unwrap();
    assert_eq!(response.retrieved_context.len(), 2);
    assert!(response
        .retrieved_context
        .iter()
        .all(|doc| doc.starts_with("my dog is sick day")));
}

#[tokio::test]
async fn custom_persona_drives_prompt_and_response() {
    let persona = Persona::from_json(
        r#"{
            "name": "Jake",
            "core_traits": ["calm"],
            "emotional_intelligence": 0.9,
            "empathy_baseline": 0.7,
            "response_patterns": {
                "Sadness": {
                    "empathy_level": 0.9,
                    "response_style": "quiet and present"
                }
            }
        }"#,
    )
    .unwrap();
    let harness = TestHarness::builder().with_persona(persona).build().await.unwrap();

    let response = harness.send_message("I feel sad").await.unwrap();

    assert_eq!(response.character, "Jake");
    let prompt = harness.mock_provider.prompts().await.remove(0);
    assert!(prompt.contains("quiet and present"));
    assert!(prompt.trim_end().ends_with("Jake:"));
}

// ---- CLI against harness files ----

fn write_config(harness: &TestHarness) -> std::path::PathBuf {
    let path = harness.data_dir().join("emora.toml");
    let rendered = toml::to_string(&harness.config).unwrap();
    std::fs::write(&path, rendered).unwrap();
    path
}

fn emora(config: &std::path::Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_emora"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

#[tokio::test]
async fn cli_state_reads_snapshot_written_by_chat() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.send_message("I feel happy").await.unwrap();
    harness.send_message("I feel great").await.unwrap();
    let config = write_config(&harness);

    let output = emora(&config, &["state", "--json"]);
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["turn_count"], 2);
    assert_eq!(view["dominant_emotion"], "joy");
    assert_eq!(view["emotion_history"], serde_json::json!(["joy", "joy"]));
}

#[tokio::test]
async fn cli_recall_counts_stored_memories() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.send_message("I feel happy").await.unwrap();
    let config = write_config(&harness);

    let output = emora(&config, &["recall", "JOY"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "We've discussed joy 1 time(s) before in our conversation."
    );

    let rejected = emora(&config, &["recall", "joy", "--top-k", "0"]);
    assert!(!rejected.status.success());
}

#[tokio::test]
async fn cli_reset_removes_snapshot() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.send_message("hello").await.unwrap();
    let config = write_config(&harness);
    assert!(std::path::Path::new(&harness.config.conversation.snapshot_path).exists());

    let output = emora(&config, &["reset"]);
    assert!(output.status.success());
    assert!(!std::path::Path::new(&harness.config.conversation.snapshot_path).exists());
}

#[test]
fn cli_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emora.toml");
    std::fs::write(&path, "[retrieval]\ntop_k = 0\n").unwrap();

    let output = emora(&path, &["config"]);
    assert!(!output.status.success());
}

#[test]
fn cli_config_prints_resolved_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emora.toml");
    std::fs::write(&path, "[retrieval]\ntop_k = 7\n").unwrap();

    let output = emora(&path, &["config"]);
    assert!(output.status.success());
    let resolved: EmoraConfig = toml::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(resolved.retrieval.top_k, 7);
}
