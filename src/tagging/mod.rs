//! Tag Extraction - LLM-Powered Structured Tagging
//!
//! `TigerStyle`: Sim-first, strict decode, no silent degradation.
//!
//! # Architecture
//!
//! ```text
//! TagExtractor<P: LLMProvider>
//! └── extract(text) → TagRecord
//! ```
//!
//! Unlike a best-effort extractor, this one never substitutes fallback data
//! for an unusable response: a payload that does not decode into the
//! four-field record is a hard `Malformed` error, and nothing downstream is
//! committed.
//!
//! # Usage
//!
//! ```rust
//! use echodraft::tagging::TagExtractor;
//! use echodraft::llm::SimLLMProvider;
//!
//! #[tokio::main]
//! async fn main() {
//!     let extractor = TagExtractor::new(SimLLMProvider::with_seed(42));
//!
//!     let tags = extractor
//!         .extract("I met Ms. Lee at Lincoln School in Portland last summer.")
//!         .await
//!         .unwrap();
//!     assert!(!tags.emotion.is_empty());
//! }
//! ```

mod prompts;
mod types;

pub use prompts::build_tag_prompt;
pub use types::{TagRecord, TagRecordError};

use crate::constants::MEMORY_TEXT_BYTES_MAX;
use crate::llm::{CompletionRequest, LLMProvider, ProviderError};

// =============================================================================
// Error Types
// =============================================================================

/// Errors from tag extraction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TagError {
    /// Input text is empty
    #[error("memory text is empty")]
    EmptyText,

    /// Input text exceeds size limit
    #[error("memory text too long: {len} bytes (max {max})")]
    TextTooLong {
        /// Actual length
        len: usize,
        /// Maximum allowed
        max: usize,
    },

    /// The underlying provider call failed
    #[error("tag provider failed: {0}")]
    Provider(#[from] ProviderError),

    /// The response does not decode into the four-field tag record
    #[error("malformed tag record: {message}")]
    Malformed {
        /// What failed to decode or validate
        message: String,
    },
}

impl TagError {
    /// Create a malformed record error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

// =============================================================================
// TagExtractor
// =============================================================================

/// Tag extractor over an LLM provider.
///
/// `TigerStyle`: Generic over provider for sim/production flexibility.
#[derive(Debug)]
pub struct TagExtractor<P: LLMProvider> {
    provider: P,
    max_tokens: Option<usize>,
}

impl<P: LLMProvider> TagExtractor<P> {
    /// Create a new tag extractor with the given LLM provider.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            max_tokens: None,
        }
    }

    /// Set the token budget for the tag response.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Extract a validated tag record from a memory's text.
    ///
    /// # Errors
    /// Returns `TagError` if the text is invalid, the provider fails, or
    /// the response cannot be decoded into a valid [`TagRecord`].
    #[tracing::instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn extract(&self, text: &str) -> Result<TagRecord, TagError> {
        // Preconditions
        let text = text.trim();
        if text.is_empty() {
            return Err(TagError::EmptyText);
        }
        if text.len() > MEMORY_TEXT_BYTES_MAX {
            return Err(TagError::TextTooLong {
                len: text.len(),
                max: MEMORY_TEXT_BYTES_MAX,
            });
        }

        let mut request = CompletionRequest::new(build_tag_prompt(text)).with_json_mode();
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let response = self.provider.complete(&request).await?;
        let record = decode_tag_record(&response)?;

        // Postcondition: a decoded record always passes its own validation
        debug_assert!(record.validate().is_ok(), "decoded record must be valid");

        Ok(record)
    }

    /// Get a reference to the underlying provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

// =============================================================================
// Strict Decode
// =============================================================================

/// Decode raw adapter output into a validated tag record.
///
/// Accepts an optional Markdown code fence around the payload (chat models
/// add one even when told not to). Everything else is strict: the payload
/// must parse as JSON, carry all four fields with the right types, and pass
/// semantic validation.
///
/// # Errors
/// Returns `TagError::Malformed` on any shape or bounds mismatch.
pub fn decode_tag_record(raw: &str) -> Result<TagRecord, TagError> {
    let payload = strip_code_fence(raw);

    let record: TagRecord = serde_json::from_str(payload)
        .map_err(|e| TagError::malformed(format!("JSON decode failed: {e}")))?;
    record
        .validate()
        .map_err(|e| TagError::malformed(e.to_string()))?;

    Ok(record)
}

/// Strip a surrounding Markdown code fence, if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

// =============================================================================
// Tests
// =============================================================================
