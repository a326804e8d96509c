//! Session Configuration
//!
//! `TigerStyle`: Sensible defaults, builder pattern, explicit over implicit.

use crate::constants::{LLM_FOLLOW_UP_TOKENS_DEFAULT, LLM_TAG_TOKENS_DEFAULT};

/// Configuration for a session's adapter calls.
///
/// `TigerStyle`:
/// - Sensible defaults via the Default impl
/// - Builder pattern for customization
/// - All fields public for transparency
///
/// # Example
///
/// ```rust
/// use echodraft::session::SessionConfig;
///
/// let config = SessionConfig::default()
///     .with_follow_up_max_tokens(256)
///     .with_follow_up_temperature(0.7);
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Token budget for follow-up generation.
    ///
    /// Default: 512
    pub follow_up_max_tokens: usize,

    /// Sampling temperature for follow-up generation (provider default
    /// if None).
    ///
    /// Default: None
    pub follow_up_temperature: Option<f32>,

    /// Token budget for tag extraction.
    ///
    /// Default: 256
    pub tag_max_tokens: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            follow_up_max_tokens: LLM_FOLLOW_UP_TOKENS_DEFAULT,
            follow_up_temperature: None,
            tag_max_tokens: LLM_TAG_TOKENS_DEFAULT,
        }
    }
}

impl SessionConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the follow-up token budget.
    ///
    /// # Panics
    /// Panics if the budget is zero.
    #[must_use]
    pub fn with_follow_up_max_tokens(mut self, max_tokens: usize) -> Self {
        assert!(max_tokens > 0, "token budget must be positive");
        self.follow_up_max_tokens = max_tokens;
        self
    }

    /// Set the follow-up sampling temperature.
    ///
    /// # Panics
    /// Panics if the temperature is not in [0.0, 1.0].
    #[must_use]
    pub fn with_follow_up_temperature(mut self, temperature: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&temperature),
            "temperature must be in [0.0, 1.0]"
        );
        self.follow_up_temperature = Some(temperature);
        self
    }

    /// Set the tag extraction token budget.
    ///
    /// # Panics
    /// Panics if the budget is zero.
    #[must_use]
    pub fn with_tag_max_tokens(mut self, max_tokens: usize) -> Self {
        assert!(max_tokens > 0, "token budget must be positive");
        self.tag_max_tokens = max_tokens;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = SessionConfig::default();
        assert_eq!(config.follow_up_max_tokens, LLM_FOLLOW_UP_TOKENS_DEFAULT);
        assert_eq!(config.tag_max_tokens, LLM_TAG_TOKENS_DEFAULT);
        assert!(config.follow_up_temperature.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SessionConfig::new()
            .with_follow_up_max_tokens(256)
            .with_follow_up_temperature(0.5)
            .with_tag_max_tokens(128);

        assert_eq!(config.follow_up_max_tokens, 256);
        assert_eq!(config.follow_up_temperature, Some(0.5));
        assert_eq!(config.tag_max_tokens, 128);
    }

    #[test]
    #[should_panic(expected = "temperature must be in")]
    fn test_invalid_temperature() {
        let _ = SessionConfig::new().with_follow_up_temperature(2.0);
    }
}
