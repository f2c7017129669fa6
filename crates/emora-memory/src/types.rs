// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory domain types.

use emora_core::Speaker;
use serde::{Deserialize, Serialize};

/// Metadata stored alongside every memory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Lower-cased emotion label.
    pub emotion: String,
    /// Who produced the utterance.
    pub speaker: Speaker,
    /// Milliseconds since the Unix epoch. Records imported without a time
    /// carry `None` and receive full recency credit.
    pub timestamp: Option<i64>,
    /// Bot reply associated with a user utterance.
    pub reply: Option<String>,
}

/// A single embedded utterance. Immutable once written.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRecord {
    /// Unique id, `"{timestamp_ms}_{8 hex chars}"`.
    pub id: String,
    /// The original utterance.
    pub text: String,
    /// Embedding vector; dimensionality is fixed by the embedding model.
    pub embedding: Vec<f32>,
    pub metadata: RecordMetadata,
}

impl MemoryRecord {
    /// Create a record stamped with `timestamp_ms` and a fresh id.
    ///
    /// The emotion label is lower-cased.
    pub fn new(
        text: impl Into<String>,
        embedding: Vec<f32>,
        emotion: &str,
        speaker: Speaker,
        timestamp_ms: i64,
        reply: Option<String>,
    ) -> Self {
        Self {
            id: new_record_id(timestamp_ms),
            text: text.into(),
            embedding,
            metadata: RecordMetadata {
                emotion: emotion.to_lowercase(),
                speaker,
                timestamp: Some(timestamp_ms),
                reply,
            },
        }
    }
}

/// A nearest-neighbor hit returned by a [`MemoryStore`](crate::MemoryStore).
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub id: String,
    pub text: String,
    /// Store-native distance to the query; smaller is closer.
    pub distance: f64,
    pub metadata: RecordMetadata,
}

/// Exact-match metadata filter. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataFilter {
    pub emotion: Option<String>,
    pub speaker: Option<Speaker>,
}

impl MetadataFilter {
    /// Filter on a single (lower-cased) emotion.
    pub fn emotion(emotion: &str) -> Self {
        Self {
            emotion: Some(emotion.to_lowercase()),
            speaker: None,
        }
    }

    /// Whether `metadata` satisfies this filter.
    pub fn matches(&self, metadata: &RecordMetadata) -> bool {
        self.emotion
            .as_ref()
            .is_none_or(|e| *e == metadata.emotion)
            && self.speaker.is_none_or(|s| s == metadata.speaker)
    }
}

/// A candidate with its individual and combined ranking scores.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub neighbor: Neighbor,
    /// `1 / (1 + distance)`.
    pub semantic: f64,
    /// Affinity between the query emotion and the candidate's emotion.
    pub emotional: f64,
    /// Exponential decay by age, or 1.0 when recency is disabled.
    pub recency: f64,
    /// Weighted combination used for ordering.
    pub score: f64,
}

/// Generate a record id from a millisecond timestamp.
pub fn new_record_id(timestamp_ms: i64) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{timestamp_ms}_{}", &suffix[..8])
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Convert f32 vector to bytes for SQLite BLOB storage.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    vec.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert SQLite BLOB back to f32 vector. Trailing partial chunks are ignored.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// Squared Euclidean distance between two equal-length vectors.
///
/// Callers must check lengths; extra components of the longer vector are ignored.
pub fn squared_l2_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum()
}
