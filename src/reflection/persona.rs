//! Persona - Reflective Viewpoints
//!
//! `TigerStyle`: Exhaustive enum prevents invalid states. The set of
//! personas is fixed; each carries the system prompt that shapes its
//! follow-up questions.

use serde::{Deserialize, Serialize};

/// A reflective viewpoint used to generate follow-up questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// Thoughtful, deep questions about the experience
    Therapist,
    /// Questions that refine and organize the memoir
    Editor,
    /// Warm, curious questions
    Friend,
    /// Tough, clarifying questions
    Skeptic,
}

impl Persona {
    /// Get all personas in display order.
    #[must_use]
    pub fn all() -> &'static [Persona] {
        &[
            Persona::Therapist,
            Persona::Editor,
            Persona::Friend,
            Persona::Skeptic,
        ]
    }

    /// Get the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Therapist => "therapist",
            Persona::Editor => "editor",
            Persona::Friend => "friend",
            Persona::Skeptic => "skeptic",
        }
    }

    /// Parse from string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "therapist" => Some(Persona::Therapist),
            "editor" => Some(Persona::Editor),
            "friend" => Some(Persona::Friend),
            "skeptic" => Some(Persona::Skeptic),
            _ => None,
        }
    }

    /// The system prompt this persona uses for follow-up generation.
    #[must_use]
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Persona::Therapist => {
                "You are a therapist offering thoughtful, deep follow-up questions about the user's experience."
            }
            Persona::Editor => {
                "You are a professional editor helping refine and organize a memoir."
            }
            Persona::Friend => "You are a warm friend, asking thoughtful, curious questions.",
            Persona::Skeptic => "You are a sharp interviewer, asking tough, clarifying questions.",
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_covers_every_persona() {
        assert_eq!(Persona::all().len(), 4);
    }

    #[test]
    fn test_parse_round_trip() {
        for persona in Persona::all() {
            assert_eq!(Persona::parse(persona.as_str()), Some(*persona));
        }
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Persona::parse("Therapist"), Some(Persona::Therapist));
        assert_eq!(Persona::parse("SKEPTIC"), Some(Persona::Skeptic));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Persona::parse("narrator"), None);
    }

    #[test]
    fn test_system_prompts_distinct() {
        let prompts: std::collections::BTreeSet<&str> =
            Persona::all().iter().map(|p| p.system_prompt()).collect();
        assert_eq!(prompts.len(), 4);
    }

    #[test]
    fn test_serde_representation() {
        let json = serde_json::to_string(&Persona::Friend).unwrap();
        assert_eq!(json, "\"friend\"");
        let parsed: Persona = serde_json::from_str("\"editor\"").unwrap();
        assert_eq!(parsed, Persona::Editor);
    }
}
