// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hybrid retriever combining embedding similarity, emotional affinity and recency.
//!
//! The engine embeds the query, over-fetches nearest neighbors from the
//! memory store, and re-ranks them by
//! `(1 - w) * semantic + w * emotional + recency_weight * recency`.

use std::sync::Arc;

use emora_config::model::RetrievalConfig;
use emora_core::{EmbeddingAdapter, EmbeddingInput, EmoraError};
use tracing::debug;

use crate::affinity::EmotionAffinityTable;
use crate::store::MemoryStore;
use crate::types::{now_millis, MetadataFilter, Neighbor, ScoredCandidate};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Per-call retrieval options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalParams {
    /// Maximum number of results; must be at least 1.
    pub top_k: usize,
    /// Weight of the emotional score in [0, 1]. Callers clamp.
    pub emotion_weight: f64,
    /// Whether to apply recency decay.
    pub include_recency: bool,
}

impl Default for RetrievalParams {
    fn default() -> Self {
        Self {
            top_k: 5,
            emotion_weight: 0.4,
            include_recency: true,
        }
    }
}

impl From<&RetrievalConfig> for RetrievalParams {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            top_k: config.top_k,
            emotion_weight: config.emotion_weight,
            include_recency: config.include_recency,
        }
    }
}

/// Engine-level tuning that does not vary per call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingConfig {
    /// Candidates fetched = `max(top_k * candidate_multiplier, min_candidates)`.
    pub candidate_multiplier: usize,
    pub min_candidates: usize,
    /// Age at which recency halves.
    pub recency_half_life_hours: f64,
    /// Coefficient of the recency term.
    pub recency_weight: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            candidate_multiplier: 2,
            min_candidates: 10,
            recency_half_life_hours: 1.0,
            recency_weight: 0.1,
        }
    }
}

impl From<&RetrievalConfig> for RankingConfig {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            candidate_multiplier: config.candidate_multiplier,
            min_candidates: config.min_candidates,
            recency_half_life_hours: config.recency_half_life_hours,
            recency_weight: config.recency_weight,
        }
    }
}

/// Semantic score: `1 / (1 + distance)`, in (0, 1] for non-negative distances.
pub fn semantic_score(distance: f64) -> f64 {
    1.0 / (1.0 + distance)
}

/// Recency score: `0.5 ^ (age_hours / half_life_hours)`.
///
/// Returns 1.0 when `timestamp` is `None`. Timestamps in the future count
/// as age zero.
pub fn recency_score(timestamp: Option<i64>, now_ms: i64, half_life_hours: f64) -> f64 {
    match timestamp {
        None => 1.0,
        Some(ts) => {
            let age_hours = (now_ms.saturating_sub(ts)).max(0) as f64 / MILLIS_PER_HOUR;
            0.5f64.powf(age_hours / half_life_hours)
        }
    }
}

/// Re-ranks nearest-neighbor candidates from a [`MemoryStore`].
///
/// Holds no mutable state; a single instance can serve concurrent callers.
pub struct RankingEngine {
    store: Arc<dyn MemoryStore>,
    embedder: Arc<dyn EmbeddingAdapter>,
    affinity: EmotionAffinityTable,
    config: RankingConfig,
}

impl RankingEngine {
    /// Create an engine with the built-in affinity groups and default tuning.
    pub fn new(store: Arc<dyn MemoryStore>, embedder: Arc<dyn EmbeddingAdapter>) -> Self {
        Self {
            store,
            embedder,
            affinity: EmotionAffinityTable::default(),
            config: RankingConfig::default(),
        }
    }

    /// Replace the tuning parameters.
    pub fn with_config(mut self, config: RankingConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the affinity table.
    pub fn with_affinity(mut self, affinity: EmotionAffinityTable) -> Self {
        self.affinity = affinity;
        self
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Number of nearest neighbors requested for a given `top_k`.
    pub fn candidate_count(&self, top_k: usize) -> usize {
        top_k
            .saturating_mul(self.config.candidate_multiplier)
            .max(self.config.min_candidates)
    }

    /// Retrieve up to `top_k` memory texts relevant to `query` and `emotion`.
    ///
    /// An empty store yields an empty vector. Embedding and store failures
    /// are returned to the caller.
    pub async fn retrieve(
        &self,
        query: &str,
        emotion: &str,
        params: RetrievalParams,
    ) -> Result<Vec<String>, EmoraError> {
        let scored = self.retrieve_scored(query, emotion, params).await?;
        Ok(scored.into_iter().map(|c| c.neighbor.text).collect())
    }

    /// Like [`retrieve`](Self::retrieve) but keeps the individual scores.
    pub async fn retrieve_scored(
        &self,
        query: &str,
        emotion: &str,
        params: RetrievalParams,
    ) -> Result<Vec<ScoredCandidate>, EmoraError> {
        check_top_k(params.top_k)?;

        let output = self.embedder.embed(EmbeddingInput::single(query)).await?;
        let query_embedding =
            output
                .embeddings
                .into_iter()
                .next()
                .ok_or_else(|| EmoraError::Embedding {
                    message: "embedding returned no vectors".to_string(),
                    source: None,
                })?;

        let n_candidates = self.candidate_count(params.top_k);
        let candidates = self
            .store
            .query_nearest(&query_embedding, n_candidates, None)
            .await?;

        debug!(
            requested = n_candidates,
            found = candidates.len(),
            top_k = params.top_k,
            "ranking memory candidates"
        );

        Ok(self.rank_candidates(candidates, emotion, params, now_millis()))
    }

    /// Score, stable-sort and truncate candidates. Pure; `now_ms` is explicit.
    pub fn rank_candidates(
        &self,
        candidates: Vec<Neighbor>,
        emotion: &str,
        params: RetrievalParams,
        now_ms: i64,
    ) -> Vec<ScoredCandidate> {
        let w = params.emotion_weight;

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|neighbor| {
                let semantic = semantic_score(neighbor.distance);
                let emotional = self.affinity.similarity(emotion, &neighbor.metadata.emotion);
                let recency = if params.include_recency {
                    recency_score(
                        neighbor.metadata.timestamp,
                        now_ms,
                        self.config.recency_half_life_hours,
                    )
                } else {
                    1.0
                };
                let score = (1.0 - w) * semantic
                    + w * emotional
                    + self.config.recency_weight * recency;
                ScoredCandidate {
                    neighbor,
                    semantic,
                    emotional,
                    recency,
                    score,
                }
            })
            .collect();

        // Stable: equal scores keep nearest-neighbor order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(params.top_k);
        scored
    }

    /// Summarize how often `emotion` has come up before.
    ///
    /// Counts up to `top_k` stored records with exactly this emotion; no
    /// embedding or ranking is involved.
    pub async fn summarize_emotional_history(
        &self,
        emotion: &str,
        top_k: usize,
    ) -> Result<String, EmoraError> {
        check_top_k(top_k)?;
        let matches = self
            .store
            .find_by_metadata(&MetadataFilter::emotion(emotion), top_k)
            .await?;
        Ok(emotional_history_message(emotion, matches.len()))
    }
}

fn check_top_k(top_k: usize) -> Result<(), EmoraError> {
    if top_k == 0 {
        return Err(EmoraError::InvalidParameter(
            "top_k must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Template for the emotional-history summary.
pub fn emotional_history_message(emotion: &str, count: usize) -> String {
    if count == 0 {
        format!("This is the first time we're exploring {emotion} together.")
    } else {
        format!("We've discussed {emotion} {count} time(s) before in our conversation.")
    }
}
