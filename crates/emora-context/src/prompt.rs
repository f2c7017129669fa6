// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emotional prompt assembly.

use crate::persona::Persona;

/// Placeholder shown when no memories were retrieved.
pub const NO_CONTEXT_PLACEHOLDER: &str =
    "(No relevant history yet - this may be our first interaction)";

/// Everything the prompt is built from.
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    /// Retrieved memories, already joined.
    pub context: &'a str,
    pub user_input: &'a str,
    pub emotion: &'a str,
    pub persona: &'a Persona,
    /// Rendered recent turns, if recent context was requested.
    pub history: Option<&'a str>,
}

/// The persona rendered as a character profile block.
pub fn character_profile(persona: &Persona) -> String {
    format!(
        "Character Profile:\nName: {}\nPersonality: {}\nEmotional Intelligence: {:.0}%\nBackground: {}\nSpeaking Style: {}",
        persona.name,
        persona.core_traits.join(", "),
        persona.emotional_intelligence * 100.0,
        persona.background,
        persona.speaking_style,
    )
}

/// How the persona should respond to `emotion`.
pub fn emotional_guidance(emotion: &str, persona: &Persona) -> String {
    let pattern = persona.response_pattern(emotion);
    let examples = pattern
        .example_phrases
        .iter()
        .take(2)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("; ");
    let traits = persona
        .core_traits
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Emotional Response Guidance for {emotion}:\n- Empathy Level: {:.0}%\n- Response Style: {}\n- Example approaches: {examples}\n\nRemember to maintain {}'s core traits: {traits}",
        pattern.empathy_level * 100.0,
        pattern.response_style,
        persona.name,
    )
}

/// Build the full generation prompt.
///
/// Sections, in order: role, emotional context, relevant memories, recent
/// conversation (only when `history` is non-empty), current interaction and
/// response instructions. The prompt ends with `"{name}:"` so the model
/// continues in character.
pub fn build_emotional_prompt(input: PromptInput<'_>) -> String {
    let PromptInput {
        context,
        user_input,
        emotion,
        persona,
        history,
    } = input;

    let mut parts: Vec<String> = vec![
        "# YOUR ROLE".into(),
        character_profile(persona),
        String::new(),
        "# EMOTIONAL CONTEXT".into(),
        format!("The user is currently experiencing: **{emotion}**"),
        String::new(),
        emotional_guidance(emotion, persona),
        String::new(),
        "# RELEVANT MEMORIES & CONTEXT".into(),
        "Here are relevant past moments from our conversation:".into(),
        if context.trim().is_empty() {
            NO_CONTEXT_PLACEHOLDER.to_string()
        } else {
            context.to_string()
        },
        String::new(),
    ];

    if let Some(history) = history.filter(|h| !h.is_empty()) {
        parts.extend(["# RECENT CONVERSATION".into(), history.to_string(), String::new()]);
    }

    parts.extend([
        "# CURRENT INTERACTION".into(),
        format!("User: {user_input}"),
        String::new(),
        "# YOUR RESPONSE".into(),
        format!(
            "Respond as {}, maintaining your character traits and responding appropriately to the user's {emotion}.",
            persona.name
        ),
        "Be authentic, empathetic, and true to your personality. Keep your response natural and conversational.".into(),
        String::new(),
        format!("{}:", persona.name),
    ]);

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(persona: &'a Persona, context: &'a str, history: Option<&'a str>) -> PromptInput<'a> {
        PromptInput {
            context,
            user_input: "I feel lonely today.",
            emotion: "sadness",
            persona,
            history,
        }
    }

    #[test]
    fn profile_formats_percentages() {
        let profile = character_profile(&Persona::default());
        assert!(profile.starts_with("Character Profile:\nName: Aria\n"));
        assert!(profile.contains("Personality: empathetic, supportive, non-judgmental, curious about human emotions, patient listener"));
        assert!(profile.contains("Emotional Intelligence: 90%"));
    }

    #[test]
    fn guidance_uses_first_two_examples_and_three_traits() {
        let guidance = emotional_guidance("sadness", &Persona::default());
        assert!(guidance.starts_with("Emotional Response Guidance for sadness:\n- Empathy Level: 95%\n"));
        assert!(guidance.contains("- Response Style: deeply empathetic, validating, gentle"));
        assert!(guidance.contains(
            "- Example approaches: I hear the sadness in your words, and I want you to know that's completely valid.; It's okay to feel this way. What you're experiencing matters.\n"
        ));
        assert!(!guidance.contains("difficult moment"));
        assert!(guidance.ends_with("Remember to maintain Aria's core traits: empathetic, supportive, non-judgmental"));
    }

    #[test]
    fn guidance_for_unknown_emotion_uses_baseline() {
        let guidance = emotional_guidance("awe", &Persona::default());
        assert!(guidance.contains("- Empathy Level: 85%"));
        assert!(guidance.contains("- Example approaches: I understand.; Tell me more about that."));
    }

    #[test]
    fn prompt_sections_appear_in_order() {
        let persona = Persona::default();
        let prompt = build_emotional_prompt(input(&persona, "past memory", Some("User (joy): hi\nAssistant: hello")));
        let order = [
            "# YOUR ROLE",
            "# EMOTIONAL CONTEXT",
            "The user is currently experiencing: **sadness**",
            "# RELEVANT MEMORIES & CONTEXT",
            "past memory",
            "# RECENT CONVERSATION",
            "# CURRENT INTERACTION",
            "User: I feel lonely today.",
            "# YOUR RESPONSE",
        ];
        let mut last = 0;
        for marker in order {
            let pos = prompt[last..].find(marker).map(|p| p + last);
            assert!(pos.is_some(), "missing or out of order: {marker}");
            last = pos.unwrap();
        }
        assert!(prompt.ends_with("\nAria:"));
    }

    #[test]
    fn blank_context_uses_placeholder_and_history_is_optional() {
        let persona = Persona::default();
        let prompt = build_emotional_prompt(input(&persona, "  \n", None));
        assert!(prompt.contains(NO_CONTEXT_PLACEHOLDER));
        assert!(!prompt.contains("# RECENT CONVERSATION"));

        let prompt = build_emotional_prompt(input(&persona, "", Some("")));
        assert!(!prompt.contains("# RECENT CONVERSATION"));
    }
}
