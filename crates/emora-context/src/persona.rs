// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Character persona definition and loading.

use std::collections::BTreeMap;

use emora_config::model::PersonaConfig;
use emora_core::EmoraError;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// How the character responds to one emotion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponsePattern {
    /// 0.0 to 1.0.
    pub empathy_level: f64,
    pub response_style: String,
    #[serde(default)]
    pub example_phrases: Vec<String>,
}

/// The companion's personality and per-emotion response patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Persona {
    pub name: String,
    pub core_traits: Vec<String>,
    /// 0.0 to 1.0.
    pub emotional_intelligence: f64,
    /// Empathy used for emotions without an explicit pattern.
    pub empathy_baseline: f64,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub speaking_style: String,
    /// Keyed by lower-case emotion label.
    #[serde(default)]
    pub response_patterns: BTreeMap<String, ResponsePattern>,
}

fn pattern(empathy_level: f64, response_style: &str, phrases: [&str; 3]) -> ResponsePattern {
    ResponsePattern {
        empathy_level,
        response_style: response_style.to_string(),
        example_phrases: phrases.iter().map(|p| p.to_string()).collect(),
    }
}

impl Default for Persona {
    /// The built-in companion, Aria.
    fn default() -> Self {
        let response_patterns = BTreeMap::from([
            (
                "sadness".to_string(),
                pattern(
                    0.95,
                    "deeply empathetic, validating, gentle",
                    [
                        "I hear the sadness in your words, and I want you to know that's completely valid.",
                        "It's okay to feel this way. What you're experiencing matters.",
                        "I'm here with you through this difficult moment.",
                    ],
                ),
            ),
            (
                "joy".to_string(),
                pattern(
                    0.9,
                    "celebratory, warm, enthusiastic but not overwhelming",
                    [
                        "That's wonderful! I can feel your happiness.",
                        "I'm so glad you're experiencing this joy!",
                        "This sounds like such a beautiful moment for you.",
                    ],
                ),
            ),
            (
                "anger".to_string(),
                pattern(
                    0.88,
                    "validating, calm, grounding",
                    [
                        "Your anger is valid. What happened that brought this up?",
                        "It sounds like something really frustrating occurred.",
                        "I understand why you'd feel this way.",
                    ],
                ),
            ),
            (
                "fear".to_string(),
                pattern(
                    0.92,
                    "reassuring, grounding, safe",
                    [
                        "I'm here with you. You're safe to share your fears.",
                        "Fear can be overwhelming. Let's take this one step at a time.",
                        "What you're feeling is understandable.",
                    ],
                ),
            ),
            (
                "surprise".to_string(),
                pattern(
                    0.75,
                    "curious, engaged, reflective",
                    [
                        "That must have caught you off guard!",
                        "Tell me more about what surprised you.",
                        "How are you processing this unexpected moment?",
                    ],
                ),
            ),
            (
                "neutral".to_string(),
                pattern(
                    0.7,
                    "conversational, open, curious",
                    [
                        "I'm listening. What's on your mind?",
                        "Tell me more about what you're thinking.",
                        "I'm here to explore this with you.",
                    ],
                ),
            ),
        ]);

        Self {
            name: "Aria".to_string(),
            core_traits: [
                "empathetic",
                "supportive",
                "non-judgmental",
                "curious about human emotions",
                "patient listener",
            ]
            .iter()
            .map(|t| t.to_string())
            .collect(),
            emotional_intelligence: 0.9,
            empathy_baseline: 0.85,
            background: "I am an emotionally intelligent AI companion designed to understand \
                         and respond to human emotions with care and authenticity. I believe every \
                         emotion is valid and worth exploring."
                .to_string(),
            speaking_style: "warm, conversational, and genuine. I use natural language and \
                             occasionally share gentle insights. I mirror emotional tone appropriately."
                .to_string(),
            response_patterns,
        }
    }
}

impl Persona {
    /// Pattern for `emotion`, or a generic supportive pattern at the
    /// persona's empathy baseline.
    pub fn response_pattern(&self, emotion: &str) -> ResponsePattern {
        self.response_patterns
            .get(&emotion.to_lowercase())
            .cloned()
            .unwrap_or_else(|| ResponsePattern {
                empathy_level: self.empathy_baseline,
                response_style: "supportive and understanding".to_string(),
                example_phrases: vec![
                    "I understand.".to_string(),
                    "Tell me more about that.".to_string(),
                ],
            })
    }

    /// Parse a persona from JSON. Pattern keys are lower-cased.
    pub fn from_json(json: &str) -> Result<Self, EmoraError> {
        let mut persona: Persona = serde_json::from_str(json)
            .map_err(|e| EmoraError::Config(format!("invalid persona file: {e}")))?;
        if persona.name.trim().is_empty() {
            return Err(EmoraError::Config("persona name must not be empty".to_string()));
        }
        persona.response_patterns = std::mem::take(&mut persona.response_patterns)
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Ok(persona)
    }

    /// Load the configured persona.
    ///
    /// # Priority
    /// 1. `config.persona_file` -- JSON read from disk
    /// 2. The built-in default persona
    ///
    /// An unreadable or invalid file is logged and the default is used.
    pub async fn load(config: &PersonaConfig) -> Self {
        let Some(ref path) = config.persona_file else {
            return Self::default();
        };

        let loaded = match tokio::fs::read_to_string(path).await {
            Ok(content) => Self::from_json(&content),
            Err(e) => Err(EmoraError::Config(format!("failed to read persona file: {e}"))),
        };

        match loaded {
            Ok(persona) => {
                info!(path = path.as_str(), name = %persona.name, "loaded persona from file");
                persona
            }
            Err(e) => {
                warn!(
                    path = path.as_str(),
                    error = %e,
                    "failed to load persona file, falling back to default"
                );
                Self::default()
            }
        }
    }
}
