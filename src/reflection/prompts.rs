//! Reflection Prompts - LLM Prompt Templates
//!
//! `TigerStyle`: Structured prompts with clear output expectations. The
//! persona's viewpoint travels in the system message, not here.

/// Follow-up prompt template.
///
/// Placeholders:
/// - `{text}` - The memory narrative
pub const FOLLOW_UP_PROMPT: &str =
    "Memory:\n{text}\n\nAsk 2\u{2013}3 thoughtful follow-up questions.";

/// Build the follow-up prompt for a memory.
#[must_use]
pub fn build_follow_up_prompt(text: &str) -> String {
    FOLLOW_UP_PROMPT.replace("{text}", text)
}
