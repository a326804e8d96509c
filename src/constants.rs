//! `TigerStyle` Constants
//!
//! All limits use big-endian naming: `CATEGORY_SPECIFICS_UNIT_LIMIT`
//! Example: `MEMORY_TEXT_BYTES_MAX` (not `MAX_MEMORY_TEXT_SIZE`)
//!
//! Every constant includes units in the name:
//! - `_BYTES_MAX` for size limits
//! - `_COUNT_MAX` for quantity limits
//! - `_TOKENS_DEFAULT` for LLM token budgets

// =============================================================================
// Memory Entry Limits
// =============================================================================

/// Maximum size of a captured memory narrative.
/// Kept well under `LLM_PROMPT_BYTES_MAX` so a full-size memory plus the
/// prompt template still fits in one request.
pub const MEMORY_TEXT_BYTES_MAX: usize = 50_000; // 50KB

/// Maximum size of a generated follow-up question block
pub const FOLLOW_UP_BYTES_MAX: usize = 10_000;

/// Maximum size of the user's reply to a follow-up
pub const RESPONSE_BYTES_MAX: usize = 50_000;

// =============================================================================
// Tag Record Limits
// =============================================================================

/// Maximum number of items in each tag set (people, places, themes)
pub const TAG_ITEMS_COUNT_MAX: usize = 50;

/// Maximum length of a single tag item
pub const TAG_ITEM_BYTES_MAX: usize = 256;

/// Maximum length of the emotion label
pub const TAG_EMOTION_BYTES_MAX: usize = 64;

// =============================================================================
// LLM Limits
// =============================================================================

/// Maximum size of an LLM prompt
pub const LLM_PROMPT_BYTES_MAX: usize = 100_000; // 100KB

/// Maximum size of an LLM response
pub const LLM_RESPONSE_BYTES_MAX: usize = 50_000; // 50KB

/// Default token budget for follow-up generation
pub const LLM_FOLLOW_UP_TOKENS_DEFAULT: usize = 512;

/// Default token budget for tag extraction
pub const LLM_TAG_TOKENS_DEFAULT: usize = 256;

// =============================================================================
// Transcription Limits
// =============================================================================

/// Maximum size of an audio buffer submitted for transcription
pub const TRANSCRIPTION_AUDIO_BYTES_MAX: usize = 25 * 1024 * 1024; // 25MB

/// Maximum number of words in a simulated transcript
pub const SIM_TRANSCRIPT_WORDS_COUNT_MAX: usize = 12;

// =============================================================================
// Simulation Limits
// =============================================================================

/// Maximum probability for fault injection (1.0 = 100%)
pub const SIM_FAULT_PROBABILITY_MAX: f64 = 1.0;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_limits_valid() {
        assert!(MEMORY_TEXT_BYTES_MAX > 0);
        assert!(FOLLOW_UP_BYTES_MAX < MEMORY_TEXT_BYTES_MAX);
        assert!(RESPONSE_BYTES_MAX <= MEMORY_TEXT_BYTES_MAX);
    }

    #[test]
    fn test_tag_limits_valid() {
        assert!(TAG_ITEM_BYTES_MAX > 0);
        assert!(TAG_EMOTION_BYTES_MAX <= TAG_ITEM_BYTES_MAX);
        assert!(TAG_ITEMS_COUNT_MAX > 0);
    }

    #[test]
    fn test_llm_limits_valid() {
        // A full-size memory must fit in a prompt alongside the template
        assert!(MEMORY_TEXT_BYTES_MAX + 1024 <= LLM_PROMPT_BYTES_MAX);
        assert!(LLM_RESPONSE_BYTES_MAX < LLM_PROMPT_BYTES_MAX);
    }
}
