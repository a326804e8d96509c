//! Reflection - Persona-Scoped Follow-Up Generation
//!
//! `TigerStyle`: Sim-first, strict validation, no partial state.
//!
//! # Architecture
//!
//! ```text
//! FollowUpGenerator<P: LLMProvider>
//! └── generate(text, persona) → String
//! ```
//!
//! # Usage
//!
//! ```rust
//! use echodraft::reflection::{FollowUpGenerator, Persona};
//! use echodraft::llm::SimLLMProvider;
//!
//! #[tokio::main]
//! async fn main() {
//!     let generator = FollowUpGenerator::new(SimLLMProvider::with_seed(42));
//!
//!     let questions = generator
//!         .generate("We drove to the coast at dawn.", Persona::Friend)
//!         .await
//!         .unwrap();
//!     assert!(!questions.is_empty());
//! }
//! ```

mod persona;
mod prompts;

pub use persona::Persona;
pub use prompts::build_follow_up_prompt;

use crate::constants::{FOLLOW_UP_BYTES_MAX, MEMORY_TEXT_BYTES_MAX};
use crate::llm::{CompletionRequest, LLMProvider, ProviderError};

// =============================================================================
// Error Types
// =============================================================================

/// Errors from follow-up generation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ReflectionError {
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
    #[error("follow-up provider failed: {0}")]
    Provider(#[from] ProviderError),
}

// =============================================================================
// FollowUpGenerator
// =============================================================================

/// Follow-up question generator over an LLM provider.
///
/// `TigerStyle`: Generic over provider for sim/production flexibility.
/// A blank response from the provider is a failure, never a usable
/// follow-up, because the reply step requires a non-empty question.
#[derive(Debug)]
pub struct FollowUpGenerator<P: LLMProvider> {
    provider: P,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
}

impl<P: LLMProvider> FollowUpGenerator<P> {
    /// Create a new generator with the given LLM provider.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Set the token budget for generated questions.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Generate reflective follow-up questions for a memory.
    ///
    /// # Errors
    /// Returns `ReflectionError` if the text is empty or too long, or if the
    /// provider fails or returns a blank response.
    #[tracing::instrument(skip(self, text), fields(persona = %persona, text_len = text.len()))]
    pub async fn generate(&self, text: &str, persona: Persona) -> Result<String, ReflectionError> {
        // Preconditions
        let text = text.trim();
        if text.is_empty() {
            return Err(ReflectionError::EmptyText);
        }
        if text.len() > MEMORY_TEXT_BYTES_MAX {
            return Err(ReflectionError::TextTooLong {
                len: text.len(),
                max: MEMORY_TEXT_BYTES_MAX,
            });
        }

        let mut request = CompletionRequest::new(build_follow_up_prompt(text))
            .with_system(persona.system_prompt());
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        let response = self.provider.complete(&request).await?;
        let follow_up = response.trim();
        if follow_up.is_empty() {
            tracing::warn!(persona = %persona, "provider returned blank follow-up");
            return Err(ProviderError::invalid_response("blank follow-up").into());
        }
        if follow_up.len() > FOLLOW_UP_BYTES_MAX {
            return Err(ProviderError::invalid_response(format!(
                "follow-up too long: {} bytes (max {FOLLOW_UP_BYTES_MAX})",
                follow_up.len()
            ))
            .into());
        }

        Ok(follow_up.to_string())
    }

    /// Get a reference to the underlying provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

// =============================================================================
// Tests
// =============================================================================
