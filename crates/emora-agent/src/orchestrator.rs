// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-request pipeline: detect, retrieve, generate, persist.
//!
//! The orchestrator owns the conversation tracker explicitly instead of
//! relying on module-level state. Lifecycle: the tracker loads its snapshot
//! on first use, persists after every turn, and is cleared by
//! [`Orchestrator::reset_conversation`].

use std::sync::Arc;
use std::time::Instant;

use emora_config::EmoraConfig;
use emora_context::{build_emotional_prompt, Persona, PromptInput};
use emora_conversation::{
    ConversationState, ConversationTracker, ConversationTurn, SnapshotStore,
};
use emora_core::{
    EmbeddingAdapter, EmoraError, EmotionClassifier, GenerationRequest, ProviderAdapter, Speaker,
};
use emora_memory::{
    now_millis, MemoryLog, MemoryLogEntry, MemoryRecorder, MemoryStore, RankingConfig,
    RankingEngine, RetrievalParams,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::reply::{resolve_reply, ReplyOutcome};
use crate::request::ChatRequest;

/// Separator between retrieved memories in the prompt.
const CONTEXT_SEPARATOR: &str = "\n---\n";

/// Turns shown in [`ConversationView::recent_context`].
const VIEW_CONTEXT_TURNS: usize = 5;

/// The external models and stores the orchestrator drives.
#[derive(Clone)]
pub struct Collaborators {
    pub classifier: Arc<dyn EmotionClassifier>,
    pub embedder: Arc<dyn EmbeddingAdapter>,
    pub provider: Arc<dyn ProviderAdapter>,
    pub store: Arc<dyn MemoryStore>,
}

/// Conversation statistics after a turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationStats {
    pub turn_count: usize,
    pub dominant_emotion: String,
    /// Last five emotions joined by an arrow, or "Starting conversation".
    pub emotional_journey: String,
}

/// Everything returned from one chat turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub user_emotion: String,
    pub retrieved_context: Vec<String>,
    /// How often this emotion came up before; `None` if the lookup failed.
    pub emotional_summary: Option<String>,
    pub conversation_stats: ConversationStats,
    pub character: String,
    pub outcome: ReplyOutcome,
}

/// Read-only view of the conversation state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationView {
    pub turn_count: usize,
    pub dominant_emotion: String,
    pub emotion_history: Vec<String>,
    pub emotional_summary: String,
    pub recent_context: String,
}

impl ConversationView {
    pub fn from_state(state: &ConversationState) -> Self {
        Self {
            turn_count: state.turn_count(),
            dominant_emotion: state.dominant_emotion().to_string(),
            emotion_history: state.emotion_history().to_vec(),
            emotional_summary: state.emotional_summary(),
            recent_context: state.recent_context(VIEW_CONTEXT_TURNS),
        }
    }
}

struct Settings {
    recent_context_turns: usize,
    summary_top_k: usize,
    top_k: usize,
    include_recency: bool,
    temperature: f32,
    max_tokens: u32,
}

/// Drives one emotionally-aware chat turn at a time; safe to share.
pub struct Orchestrator {
    classifier: Arc<dyn EmotionClassifier>,
    provider: Arc<dyn ProviderAdapter>,
    engine: RankingEngine,
    recorder: MemoryRecorder,
    memory_log: MemoryLog,
    tracker: ConversationTracker,
    persona: Persona,
    settings: Settings,
}

impl Orchestrator {
    /// Assemble an orchestrator from collaborators, configuration and persona.
    pub fn new(collaborators: Collaborators, config: &EmoraConfig, persona: Persona) -> Self {
        let Collaborators {
            classifier,
            embedder,
            provider,
            store,
        } = collaborators;

        let engine = RankingEngine::new(store.clone(), embedder.clone())
            .with_config(RankingConfig::from(&config.retrieval));
        let recorder = MemoryRecorder::new(store, embedder);
        let tracker = ConversationTracker::new(
            SnapshotStore::new(&config.conversation.snapshot_path),
            config.conversation.capacity,
        );

        Self {
            classifier,
            provider,
            engine,
            recorder,
            memory_log: MemoryLog::new(&config.conversation.memory_log_path),
            tracker,
            persona,
            settings: Settings {
                recent_context_turns: config.agent.recent_context_turns,
                summary_top_k: config.agent.summary_top_k,
                top_k: config.retrieval.top_k,
                include_recency: config.retrieval.include_recency,
                temperature: config.agent.temperature,
                max_tokens: config.agent.max_tokens,
            },
        }
    }

    /// The active persona.
    pub fn character(&self) -> &Persona {
        &self.persona
    }

    pub fn tracker(&self) -> &ConversationTracker {
        &self.tracker
    }

    pub fn memory_log(&self) -> &MemoryLog {
        &self.memory_log
    }

    /// Process one user message.
    ///
    /// Invalid requests and classification failures are returned as errors
    /// before anything is persisted. Retrieval failures degrade to an empty
    /// context and generation problems to a fallback reply, so every valid
    /// request that can be classified gets a reply.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, EmoraError> {
        let request = request.validate()?;
        let timestamp = now_millis();
        let message = request.message.as_str();

        let emotion = self.detect_emotion(message).await?;

        let history = if request.use_recent_context {
            let n = self.settings.recent_context_turns;
            let rendered = self.tracker.read(|state| state.recent_context(n)).await;
            (!rendered.is_empty()).then_some(rendered)
        } else {
            None
        };

        let retrieved_context = self
            .retrieve_context(message, &emotion, request.emotion_weight)
            .await?;
        let context = retrieved_context.join(CONTEXT_SEPARATOR);

        let prompt = build_emotional_prompt(PromptInput {
            context: &context,
            user_input: message,
            emotion: &emotion,
            persona: &self.persona,
            history: history.as_deref(),
        });
        debug!(
            prompt_chars = prompt.len(),
            memories = retrieved_context.len(),
            "prompt assembled"
        );

        let result = self
            .provider
            .complete(GenerationRequest {
                prompt,
                temperature: self.settings.temperature,
                max_tokens: self.settings.max_tokens,
            })
            .await;
        if let Ok(ref outcome) = result {
            debug!(kind = outcome.kind(), "generation finished");
        }
        let (reply, outcome) = resolve_reply(result);
        crate::metrics::record_generation_outcome(outcome);

        self.persist_turn(message, &emotion, &reply, timestamp).await;

        let emotional_summary = match self
            .engine
            .summarize_emotional_history(&emotion, self.settings.summary_top_k)
            .await
        {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(error = %e, emotion = %emotion, "emotional history lookup failed");
                None
            }
        };

        let conversation_stats = self
            .tracker
            .read(|state| ConversationStats {
                turn_count: state.turn_count(),
                dominant_emotion: state.dominant_emotion().to_string(),
                emotional_journey: state
                    .emotional_journey()
                    .unwrap_or_else(|| "Starting conversation".to_string()),
            })
            .await;

        crate::metrics::record_chat_turn(&emotion);
        info!(
            emotion = %emotion,
            outcome = %outcome,
            turn_count = conversation_stats.turn_count,
            "chat turn completed"
        );

        Ok(ChatResponse {
            reply,
            user_emotion: emotion,
            retrieved_context,
            emotional_summary,
            conversation_stats,
            character: self.persona.name.clone(),
            outcome,
        })
    }

    async fn detect_emotion(&self, message: &str) -> Result<String, EmoraError> {
        let label = self.classifier.classify(message).await?;
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            debug!("classifier returned an empty label, using neutral");
            return Ok("neutral".to_string());
        }
        debug!(emotion = %label, "emotion detected");
        Ok(label)
    }

    async fn retrieve_context(
        &self,
        message: &str,
        emotion: &str,
        emotion_weight: f64,
    ) -> Result<Vec<String>, EmoraError> {
        let params = RetrievalParams {
            top_k: self.settings.top_k,
            emotion_weight,
            include_recency: self.settings.include_recency,
        };

        let started = Instant::now();
        let result = self.engine.retrieve(message, emotion, params).await;
        crate::metrics::record_retrieval_latency(started.elapsed().as_secs_f64());

        match result {
            Ok(docs) => Ok(docs),
            Err(e @ EmoraError::InvalidParameter(_)) => Err(e),
            Err(e) => {
                warn!(error = %e, "memory retrieval failed, continuing without context");
                crate::metrics::record_retrieval_failure();
                Ok(vec![])
            }
        }
    }

    /// Store the exchange in the memory store, audit log and conversation
    /// state. Each write is independent and best effort.
    async fn persist_turn(&self, message: &str, emotion: &str, reply: &str, timestamp: i64) {
        if let Err(e) = self
            .recorder
            .record_at(message, emotion, Speaker::User, Some(reply.to_string()), timestamp)
            .await
        {
            warn!(error = %e, "failed to store memory record");
        }

        let entry = MemoryLogEntry {
            user_text: message.to_string(),
            user_emotion: emotion.to_string(),
            bot_reply: reply.to_string(),
        };
        if let Err(e) = self.memory_log.append(&entry).await {
            warn!(error = %e, path = %self.memory_log.path().display(), "failed to append memory log");
        }

        let turn = ConversationTurn {
            user_message: message.to_string(),
            user_emotion: emotion.to_string(),
            bot_response: reply.to_string(),
            timestamp,
        };
        if let Err(e) = self.tracker.record(turn).await {
            warn!(error = %e, "failed to persist conversation state");
        }
    }

    /// Current conversation state.
    pub async fn conversation_state(&self) -> ConversationView {
        self.tracker.read(ConversationView::from_state).await
    }

    /// Start over with an empty conversation. Stored memories are kept.
    pub async fn reset_conversation(&self) -> Result<(), EmoraError> {
        self.tracker.reset().await
    }

    /// Emotional-history summary for an arbitrary emotion.
    pub async fn recall(&self, emotion: &str, top_k: usize) -> Result<String, EmoraError> {
        self.engine.summarize_emotional_history(emotion, top_k).await
    }
}
