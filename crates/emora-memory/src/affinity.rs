// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic similarity between emotion labels.
//!
//! Labels are partitioned into named groups. Identical labels score 1.0,
//! labels sharing a group score 0.7, and every other pair (including labels
//! that belong to no group) scores a flat 0.3 so unmapped emotions stay
//! retrievable.

use std::collections::HashMap;
use std::sync::LazyLock;

use emora_core::EmoraError;

/// Score for two identical labels.
pub const IDENTICAL_AFFINITY: f64 = 1.0;

/// Score for two distinct labels in the same group.
pub const SAME_GROUP_AFFINITY: f64 = 0.7;

/// Score for every other pair.
pub const BASELINE_AFFINITY: f64 = 0.3;

/// The built-in partition of emotion labels.
pub const DEFAULT_GROUPS: &[(&str, &[&str])] = &[
    ("negative", &["sadness", "anger", "fear", "disgust"]),
    ("positive", &["joy", "happiness", "excitement", "love"]),
    ("neutral", &["surprise", "neutral", "curiosity"]),
];

static DEFAULT_TABLE: LazyLock<EmotionAffinityTable> = LazyLock::new(EmotionAffinityTable::default);

/// Similarity between two labels using the built-in groups.
pub fn emotion_similarity(a: &str, b: &str) -> f64 {
    DEFAULT_TABLE.similarity(a, b)
}

/// Lookup table from emotion label to the group it belongs to.
#[derive(Debug, Clone)]
pub struct EmotionAffinityTable {
    group_of: HashMap<String, String>,
}

impl Default for EmotionAffinityTable {
    fn default() -> Self {
        let group_of = DEFAULT_GROUPS
            .iter()
            .flat_map(|(group, labels)| {
                labels
                    .iter()
                    .map(move |label| (label.to_string(), group.to_string()))
            })
            .collect();
        Self { group_of }
    }
}

impl EmotionAffinityTable {
    /// Build a table from a custom partition.
    ///
    /// Labels are lower-cased. A label listed under two different groups is
    /// rejected, since the groups must form a partition.
    pub fn with_groups<G, L, S>(groups: G) -> Result<Self, EmoraError>
    where
        G: IntoIterator<Item = (S, L)>,
        L: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut group_of: HashMap<String, String> = HashMap::new();
        for (group, labels) in groups {
            let group = group.as_ref().to_string();
            for label in labels {
                let label = label.as_ref().to_lowercase();
                if let Some(existing) = group_of.get(&label)
                    && *existing != group
                {
                    return Err(EmoraError::InvalidParameter(format!(
                        "emotion `{label}` appears in both `{existing}` and `{group}` groups"
                    )));
                }
                group_of.insert(label, group.clone());
            }
        }
        Ok(Self { group_of })
    }

    /// The group a label belongs to, if any.
    pub fn group_of(&self, label: &str) -> Option<&str> {
        self.group_of
            .get(label.to_lowercase().as_str())
            .map(String::as_str)
    }

    /// Similarity score in [0, 1] between two labels, case-insensitive.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let a = a.to_lowercase();
        let b = b.to_lowercase();

        if a == b {
            return IDENTICAL_AFFINITY;
        }

        match (self.group_of.get(&a), self.group_of.get(&b)) {
            (Some(ga), Some(gb)) if ga == gb => SAME_GROUP_AFFINITY,
            _ => BASELINE_AFFINITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn identical_labels_score_one() {
        assert_eq!(emotion_similarity("joy", "joy"), 1.0);
        assert_eq!(emotion_similarity("Joy", "JOY"), 1.0);
        assert_eq!(emotion_similarity("bewilderment", "bewilderment"), 1.0);
    }

    #[test]
    fn same_group_scores_point_seven() {
        assert_eq!(emotion_similarity("sadness", "fear"), 0.7);
        assert_eq!(emotion_similarity("joy", "love"), 0.7);
        assert_eq!(emotion_similarity("surprise", "curiosity"), 0.7);
    }

    #[test]
    fn cross_group_and_unknown_score_baseline() {
        assert_eq!(emotion_similarity("sadness", "joy"), 0.3);
        assert_eq!(emotion_similarity("fear", "neutral"), 0.3);
        assert_eq!(emotion_similarity("bewilderment", "joy"), 0.3);
        assert_eq!(emotion_similarity("bewilderment", "awe"), 0.3);
    }

    #[test]
    fn group_lookup_is_case_insensitive() {
        let table = EmotionAffinityTable::default();
        assert_eq!(table.group_of("Anger"), Some("negative"));
        assert_eq!(table.group_of("awe"), None);
    }

    #[test]
    fn custom_groups_replace_defaults() {
        let table =
            EmotionAffinityTable::with_groups([("calm", vec!["Serenity", "relief"])]).unwrap();
        assert_eq!(table.similarity("serenity", "relief"), 0.7);
        assert_eq!(table.similarity("sadness", "fear"), 0.3);
    }

    #[test]
    fn overlapping_groups_are_rejected() {
        let err = EmotionAffinityTable::with_groups([
            ("a", vec!["joy", "love"]),
            ("b", vec!["Joy"]),
        ])
        .unwrap_err();
        assert!(matches!(err, EmoraError::InvalidParameter(_)));
    }

    fn label() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("sadness".to_string()),
            Just("joy".to_string()),
            Just("Fear".to_string()),
            Just("surprise".to_string()),
            Just("love".to_string()),
            "[a-zA-Z]{1,10}",
        ]
    }

    proptest! {
        #[test]
        fn similarity_is_reflexive(a in label()) {
            prop_assert_eq!(emotion_similarity(&a, &a), 1.0);
        }

        #[test]
        fn similarity_is_symmetric(a in label(), b in label()) {
            prop_assert_eq!(emotion_similarity(&a, &b), emotion_similarity(&b, &a));
        }

        #[test]
        fn similarity_is_one_of_three_levels(a in label(), b in label()) {
            let s = emotion_similarity(&a, &b);
            prop_assert!(s == 1.0 || s == 0.7 || s == 0.3);
        }
    }
}
