//! `SimTranscriptionProvider` - Deterministic Transcription Simulation
//!
//! `TigerStyle`: Primary implementation for tests and development.
//!
//! Decoding rules, in order:
//! - all-zero buffer transcribes as silence (empty string)
//! - valid UTF-8 passes through as its trimmed text, so tests can embed the
//!   exact transcript they want in the audio bytes
//! - anything else becomes a placeholder transcript of seeded filler words

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{TranscriptionError, TranscriptionProvider};
use crate::constants::{SIM_TRANSCRIPT_WORDS_COUNT_MAX, TRANSCRIPTION_AUDIO_BYTES_MAX};
use crate::sim::{DeterministicRng, FaultInjector, FaultType};

/// Filler words for placeholder transcripts of non-text audio.
const SIM_TRANSCRIPT_WORDS: &[&str] = &[
    "remember", "summer", "kitchen", "grandmother", "laughing", "evening", "river", "letter",
    "window", "garden",
];

/// Simulated transcription provider.
///
/// # Example
///
/// ```rust
/// use echodraft::transcription::{SimTranscriptionProvider, TranscriptionProvider};
///
/// #[tokio::main]
/// async fn main() {
///     let provider = SimTranscriptionProvider::with_seed(42);
///
///     let transcript = provider.transcribe(b"We drove to the coast.").await.unwrap();
///     assert_eq!(transcript, "We drove to the coast.");
///
///     let silence = provider.transcribe(&[0u8; 64]).await.unwrap();
///     assert!(silence.is_empty());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SimTranscriptionProvider {
    rng: Arc<Mutex<DeterministicRng>>,
    faults: Arc<FaultInjector>,
    seed: u64,
}

impl SimTranscriptionProvider {
    /// Create a new standalone `SimTranscriptionProvider` with the given seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Arc::new(Mutex::new(DeterministicRng::new(seed))),
            faults: Arc::new(FaultInjector::new(DeterministicRng::new(seed))),
            seed,
        }
    }

    /// Create a new `SimTranscriptionProvider` with fault injection.
    #[must_use]
    pub fn with_faults(seed: u64, faults: Arc<FaultInjector>) -> Self {
        Self {
            rng: Arc::new(Mutex::new(DeterministicRng::new(seed))),
            faults,
            seed,
        }
    }

    /// Get the seed used by this provider (for debugging/logging).
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Build a placeholder transcript for audio that is not embedded text.
    fn placeholder_transcript(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let count = rng.next_usize(3, SIM_TRANSCRIPT_WORDS_COUNT_MAX);

        (0..count)
            .map(|_| *rng.choose(SIM_TRANSCRIPT_WORDS))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl TranscriptionProvider for SimTranscriptionProvider {
    #[tracing::instrument(skip(self, audio), fields(audio_len = audio.len()))]
    async fn transcribe(&self, audio: &[u8]) -> Result<String, TranscriptionError> {
        // Preconditions
        if audio.is_empty() {
            return Err(TranscriptionError::EmptyAudio);
        }
        if audio.len() > TRANSCRIPTION_AUDIO_BYTES_MAX {
            return Err(TranscriptionError::AudioTooLarge {
                len: audio.len(),
                max: TRANSCRIPTION_AUDIO_BYTES_MAX,
            });
        }

        if let Some(fault) = self.faults.should_inject("transcribe") {
            match fault {
                FaultType::TranscriptionTimeout => return Err(TranscriptionError::Timeout),
                FaultType::TranscriptionUnavailable => {
                    return Err(TranscriptionError::unavailable("simulated outage"))
                }
                _ => {}
            }
        }

        // Silence
        if audio.iter().all(|&b| b == 0) {
            return Ok(String::new());
        }

        // Embedded text passes through
        if let Ok(text) = std::str::from_utf8(audio) {
            return Ok(text.trim().to_string());
        }

        Ok(self.placeholder_transcript())
    }

    fn name(&self) -> &'static str {
        "sim"
    }

    fn is_simulation(&self) -> bool {
        true
    }
}

// =============================================================================
// Tests
// =============================================================================
