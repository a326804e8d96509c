//! Transcription Provider Trait - Speech-to-Text Boundary
//!
//! `TigerStyle`: Simulation-first adapter for turning captured audio into a
//! memory draft.
//!
//! # Architecture
//!
//! ```text
//! TranscriptionProvider (trait)
//! ├── SimTranscriptionProvider     (always available, deterministic)
//! └── OpenAITranscriptionProvider  (feature: openai)
//! ```
//!
//! A transcript may legitimately be empty: silence transcribes to an empty
//! string, and the session layer decides what to do with it.

mod sim;

#[cfg(feature = "openai")]
mod openai;

pub use sim::SimTranscriptionProvider;

#[cfg(feature = "openai")]
pub use openai::OpenAITranscriptionProvider;

use async_trait::async_trait;

// =============================================================================
// Error Types
// =============================================================================

/// Unified error type for transcription providers.
///
/// `TigerStyle`: Explicit variants for all failure modes.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TranscriptionError {
    /// No audio bytes were provided
    #[error("audio buffer is empty")]
    EmptyAudio,

    /// Audio buffer exceeds the size limit
    #[error("audio too large: {len} bytes (max {max})")]
    AudioTooLarge {
        /// Actual length
        len: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Request timed out
    #[error("transcription timed out")]
    Timeout,

    /// Service unavailable
    #[error("transcription service unavailable: {message}")]
    Unavailable {
        /// Reason for unavailability
        message: String,
    },

    /// Response from the service is unusable
    #[error("invalid transcription response: {message}")]
    InvalidResponse {
        /// Description of what was invalid
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
}

impl TranscriptionError {
    /// Create a service unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create an invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
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

    /// Check if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Unavailable { .. })
    }
}

// =============================================================================
// Provider Trait
// =============================================================================

/// Trait for transcription providers.
///
/// `TigerStyle`: Unified interface for simulation and production.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Transcribe raw audio bytes into text.
    ///
    /// Returns a best-effort transcript; an empty string means silence.
    ///
    /// # Errors
    /// Returns `TranscriptionError` on failure.
    async fn transcribe(&self, audio: &[u8]) -> Result<String, TranscriptionError>;

    /// Get the provider name for logging/debugging.
    fn name(&self) -> &'static str;

    /// Check if this is a simulation provider.
    fn is_simulation(&self) -> bool;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_retryable() {
        assert!(TranscriptionError::Timeout.is_retryable());
        assert!(TranscriptionError::unavailable("down").is_retryable());
        assert!(!TranscriptionError::EmptyAudio.is_retryable());
        assert!(!TranscriptionError::invalid_response("garbled").is_retryable());
        assert!(!TranscriptionError::AuthenticationFailed.is_retryable());
    }
}
