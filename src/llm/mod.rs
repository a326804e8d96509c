//! LLM Provider Trait - Unified Interface for Sim and Production
//!
//! `TigerStyle`: Simulation-first LLM abstraction.
//!
//! # Architecture
//!
//! ```text
//! LLMProvider (trait)
//! ├── SimLLMProvider    (always available, deterministic)
//! └── OpenAIProvider    (feature: openai)
//! ```
//!
//! Both the follow-up generator and the tag extractor talk to this trait,
//! never to a concrete provider.
//!
//! # Usage
//!
//! ```rust
//! use echodraft::llm::{LLMProvider, SimLLMProvider, CompletionRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     let provider = SimLLMProvider::with_seed(42);
//!
//!     let request = CompletionRequest::new("Memory:\nWe drove to the coast.\n\nAsk 2\u{2013}3 thoughtful follow-up questions.");
//!     let response = provider.complete(&request).await.unwrap();
//!     assert!(!response.is_empty());
//! }
//! ```

mod sim;

#[cfg(feature = "openai")]
mod openai;

pub use sim::SimLLMProvider;

#[cfg(feature = "openai")]
pub use openai::OpenAIProvider;

use async_trait::async_trait;

use crate::constants::LLM_PROMPT_BYTES_MAX;

// =============================================================================
// Error Types
// =============================================================================

/// Unified error type for all LLM providers.
///
/// `TigerStyle`: Explicit variants for all failure modes.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// Request timed out
    #[error("request timed out")]
    Timeout,

    /// Rate limit exceeded
    #[error("rate limit exceeded, retry after {retry_after_secs:?}s")]
    RateLimit {
        /// Seconds until the limit resets (if known)
        retry_after_secs: Option<u64>,
    },

    /// Prompt exceeds the provider's context window
    #[error("context length exceeded: {len} bytes")]
    ContextOverflow {
        /// Size of the offending prompt
        len: usize,
    },

    /// Response from the provider is unusable
    #[error("invalid response: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// Service unavailable
    #[error("service unavailable: {message}")]
    Unavailable {
        /// Reason for unavailability
        message: String,
    },

    /// Authentication failed
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error
    #[error("network error: {message}")]
    Network {
        /// Description of the network error
        message: String,
    },

    /// Invalid request parameters
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Description of what was invalid
        message: String,
    },
}

impl ProviderError {
    /// Create a rate limit error.
    #[must_use]
    pub fn rate_limit(retry_after_secs: Option<u64>) -> Self {
        Self::RateLimit { retry_after_secs }
    }

    /// Create a context overflow error.
    #[must_use]
    pub fn context_overflow(len: usize) -> Self {
        Self::ContextOverflow { len }
    }

    /// Create an invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Create a service unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Check if this error is retryable.
    ///
    /// Retries are always user-initiated; this only classifies whether a
    /// retry could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::RateLimit { .. } | Self::Unavailable { .. }
        )
    }
}

// =============================================================================
// Request Types
// =============================================================================

/// Request for LLM completion.
///
/// `TigerStyle`: Explicit fields, no hidden defaults.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// The prompt text (required)
    pub prompt: String,
    /// Optional system message (for chat-style APIs)
    pub system: Option<String>,
    /// Maximum tokens to generate (provider default if None)
    pub max_tokens: Option<usize>,
    /// Temperature (0.0-1.0, provider default if None)
    pub temperature: Option<f32>,
    /// Whether to request JSON output
    pub json_mode: bool,
}

impl CompletionRequest {
    /// Create a new completion request with just a prompt.
    ///
    /// # Panics
    /// Panics if the prompt is empty or exceeds `LLM_PROMPT_BYTES_MAX`.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();

        // Preconditions
        assert!(!prompt.is_empty(), "prompt must not be empty");
        assert!(
            prompt.len() <= LLM_PROMPT_BYTES_MAX,
            "prompt exceeds {LLM_PROMPT_BYTES_MAX} bytes"
        );

        Self {
            prompt,
            system: None,
            max_tokens: None,
            temperature: None,
            json_mode: false,
        }
    }

    /// Set the system message.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set maximum tokens to generate.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set temperature.
    ///
    /// # Panics
    /// Panics if temperature is not in [0.0, 1.0].
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&temperature),
            "temperature must be in [0.0, 1.0]"
        );
        self.temperature = Some(temperature);
        self
    }

    /// Enable JSON mode (request structured output).
    #[must_use]
    pub fn with_json_mode(mut self) -> Self {
        self.json_mode = true;
        self
    }
}

// =============================================================================
// Provider Trait
// =============================================================================

/// Trait for LLM providers.
///
/// `TigerStyle`: Unified interface for simulation and production.
///
/// Higher-level components (follow-up generation, tag extraction) are
/// generic over this trait and never see a concrete provider type.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Complete a prompt with a text response.
    ///
    /// # Errors
    /// Returns `ProviderError` on failure.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;

    /// Get the provider name for logging/debugging.
    fn name(&self) -> &'static str;

    /// Check if this is a simulation provider.
    fn is_simulation(&self) -> bool;
}

// =============================================================================
// Tests
// =============================================================================
