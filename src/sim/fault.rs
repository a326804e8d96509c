//! `FaultInjector` - Probabilistic Fault Injection
//!
//! `TigerStyle`: Explicit fault injection for chaos testing the adapter
//! boundary. Every failure mode a simulated adapter can exhibit is a
//! registered fault with a probability.

use std::collections::HashMap;
use std::sync::Mutex;

use super::rng::DeterministicRng;
use crate::constants::SIM_FAULT_PROBABILITY_MAX;

/// Types of faults that can be injected.
///
/// `TigerStyle`: Every fault type is explicit and documented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultType {
    // =========================================================================
    // Language Model Faults
    // =========================================================================
    /// Completion request times out
    LlmTimeout,
    /// Rate limit exceeded
    LlmRateLimit,
    /// Service unavailable
    LlmUnavailable,
    /// Response is unusable (blank or truncated)
    LlmInvalidResponse,
    /// Response arrives but is not the JSON shape the prompt asked for.
    /// The call itself succeeds; downstream decoding must reject it.
    LlmMalformedJson,

    // =========================================================================
    // Transcription Faults
    // =========================================================================
    /// Transcription request times out
    TranscriptionTimeout,
    /// Transcription service unavailable
    TranscriptionUnavailable,
}

impl FaultType {
    /// Get the fault type name as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LlmTimeout => "llm_timeout",
            Self::LlmRateLimit => "llm_rate_limit",
            Self::LlmUnavailable => "llm_unavailable",
            Self::LlmInvalidResponse => "llm_invalid_response",
            Self::LlmMalformedJson => "llm_malformed_json",
            Self::TranscriptionTimeout => "transcription_timeout",
            Self::TranscriptionUnavailable => "transcription_unavailable",
        }
    }

    /// Check whether this fault applies to the named operation.
    ///
    /// Language model faults fire only for `llm_complete`, transcription
    /// faults only for `transcribe`.
    #[must_use]
    pub fn applies_to(&self, operation: &str) -> bool {
        match self {
            Self::LlmTimeout
            | Self::LlmRateLimit
            | Self::LlmUnavailable
            | Self::LlmInvalidResponse
            | Self::LlmMalformedJson => operation == "llm_complete",
            Self::TranscriptionTimeout | Self::TranscriptionUnavailable => {
                operation == "transcribe"
            }
        }
    }
}

/// Configuration for a specific fault.
#[derive(Debug, Clone)]
pub struct FaultConfig {
    /// The type of fault
    pub fault_type: FaultType,
    /// Probability of injection (0.0 to 1.0)
    pub probability: f64,
    /// Maximum number of injections (None = unlimited)
    pub max_injections: Option<u64>,
}

impl FaultConfig {
    /// Create a new fault configuration.
    ///
    /// # Panics
    /// Panics if probability is not in [0, 1].
    #[must_use]
    pub fn new(fault_type: FaultType, probability: f64) -> Self {
        // Precondition
        assert!(
            (0.0..=SIM_FAULT_PROBABILITY_MAX).contains(&probability),
            "probability must be in [0, {SIM_FAULT_PROBABILITY_MAX}], got {probability}"
        );

        Self {
            fault_type,
            probability,
            max_injections: None,
        }
    }

    /// Set maximum number of injections.
    ///
    /// # Panics
    /// Panics if max is zero.
    #[must_use]
    pub fn with_max_injections(mut self, max: u64) -> Self {
        // Precondition
        assert!(max > 0, "max_injections must be positive");

        self.max_injections = Some(max);
        self
    }
}

/// Fault injector for simulation testing.
///
/// `TigerStyle`:
/// - Explicit fault registration
/// - Deterministic through seeded RNG
/// - Injection counts tracked
/// - Interior mutability so it can be shared via `Arc`
#[derive(Debug)]
pub struct FaultInjector {
    rng: Mutex<DeterministicRng>,
    configs: Vec<FaultConfig>,
    counts: Mutex<HashMap<FaultType, u64>>,
}

impl FaultInjector {
    /// Create a new fault injector with no registered faults.
    #[must_use]
    pub fn new(rng: DeterministicRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            configs: Vec::new(),
            counts: Mutex::new(HashMap::new()),
        }
    }

    /// Register a fault configuration.
    pub fn register(&mut self, config: FaultConfig) {
        self.configs.push(config);
    }

    /// Decide whether a fault should be injected for the given operation.
    ///
    /// Returns the first registered fault that applies and whose probability
    /// roll succeeds. Injection counts are tracked so `max_injections` caps
    /// hold across calls.
    #[must_use]
    pub fn should_inject(&self, operation: &str) -> Option<FaultType> {
        let mut rng = self.rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut counts = self
            .counts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        for config in &self.configs {
            if !config.fault_type.applies_to(operation) {
                continue;
            }
            let count = counts.entry(config.fault_type).or_insert(0);
            if let Some(max) = config.max_injections {
                if *count >= max {
                    continue;
                }
            }
            if rng.next_float() < config.probability {
                *count += 1;
                return Some(config.fault_type);
            }
        }

        None
    }

    /// Get the number of times a fault has been injected.
    #[must_use]
    pub fn injection_count(&self, fault_type: FaultType) -> u64 {
        self.counts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&fault_type)
            .copied()
            .unwrap_or(0)
    }
}
