//! Tagging Prompts - LLM Prompt Templates
//!
//! `TigerStyle`: Structured prompts with clear output format.

/// Tag extraction prompt template.
///
/// Placeholders:
/// - `{text}` - The memory narrative
pub const TAG_PROMPT: &str = r#"You are a storytelling assistant. Extract structured tags from the user's memory.

Memory: {text}

Return JSON with this exact structure:
{
  "people": ["name", ...],
  "places": ["place", ...],
  "emotion": "one or two words",
  "themes": ["theme", ...]
}

Rules:
- Only include people and places actually mentioned
- Use a single short label for the main emotion
- Reuse recurring themes where possible, create new ones when appropriate
- Return empty arrays when nothing applies

Only return the JSON, nothing else."#;

/// Build the tag extraction prompt for a memory.
#[must_use]
pub fn build_tag_prompt(text: &str) -> String {
    TAG_PROMPT.replace("{text}", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_embeds_text() {
        let prompt = build_tag_prompt("We drove to the coast.");
        assert!(prompt.contains("Memory: We drove to the coast."));
        assert!(!prompt.contains("{text}"));
    }

    #[test]
    fn test_prompt_structure() {
        let prompt = build_tag_prompt("test");

        assert!(prompt.contains(r#""people""#));
        assert!(prompt.contains(r#""places""#));
        assert!(prompt.contains(r#""emotion""#));
        assert!(prompt.contains(r#""themes""#));
        assert!(prompt.contains("Only return the JSON"));
    }
}
