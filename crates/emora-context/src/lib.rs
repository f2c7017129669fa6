// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Character persona and emotional prompt assembly.
//!
//! The persona describes who the companion is and how it responds to each
//! emotion; [`build_emotional_prompt`] combines it with retrieved memories,
//! recent conversation and the user's message into a single prompt.

pub mod persona;
pub mod prompt;

pub use persona::{Persona, ResponsePattern};
pub use prompt::{build_emotional_prompt, character_profile, emotional_guidance, PromptInput};
