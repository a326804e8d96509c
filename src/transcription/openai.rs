//! `OpenAITranscriptionProvider` - OpenAI Audio Transcriptions Integration
//!
//! `TigerStyle`: Production provider, feature-gated behind `openai`.
//!
//! Uploads the audio buffer as multipart form data and parses the JSON
//! transcript response.

use async_trait::async_trait;
use serde::Deserialize;

use super::{TranscriptionError, TranscriptionProvider};
use crate::constants::TRANSCRIPTION_AUDIO_BYTES_MAX;

// =============================================================================
// Constants
// =============================================================================

/// Default audio transcriptions URL
const OPENAI_AUDIO_API_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Default model
const DEFAULT_MODEL: &str = "whisper-1";

// =============================================================================
// API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    text: String,
}

// =============================================================================
// OpenAITranscriptionProvider
// =============================================================================

/// OpenAI audio transcription provider.
///
/// # Example
///
/// ```rust,ignore
/// use echodraft::transcription::{OpenAITranscriptionProvider, TranscriptionProvider};
///
/// #[tokio::main]
/// async fn main() {
///     let provider = OpenAITranscriptionProvider::new(std::env::var("OPENAI_API_KEY").unwrap());
///     let audio = std::fs::read("memory.wav").unwrap();
///     let transcript = provider.transcribe(&audio).await.unwrap();
///     println!("{}", transcript);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct OpenAITranscriptionProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_url: String,
}

impl OpenAITranscriptionProvider {
    /// Create a new provider with the given API key.
    ///
    /// Uses the default model (`whisper-1`).
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_url: OPENAI_AUDIO_API_URL.to_string(),
        }
    }

    /// Set the model to use.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (proxies, compatible servers).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Get the current model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Map an error status to a `TranscriptionError`.
    fn status_error(status: reqwest::StatusCode, body: &str) -> TranscriptionError {
        match status {
            reqwest::StatusCode::UNAUTHORIZED => TranscriptionError::AuthenticationFailed,
            reqwest::StatusCode::TOO_MANY_REQUESTS
            | reqwest::StatusCode::SERVICE_UNAVAILABLE
            | reqwest::StatusCode::BAD_GATEWAY => {
                TranscriptionError::unavailable("transcription API unavailable")
            }
            reqwest::StatusCode::REQUEST_TIMEOUT | reqwest::StatusCode::GATEWAY_TIMEOUT => {
                TranscriptionError::Timeout
            }
            _ => TranscriptionError::invalid_response(format!("HTTP {status}: {body}")),
        }
    }
}

#[async_trait]
impl TranscriptionProvider for OpenAITranscriptionProvider {
    #[tracing::instrument(skip(self, audio), fields(audio_len = audio.len(), model = %self.model))]
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

        let file_part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name("memory.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::invalid_response(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("response_format", "json");

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranscriptionError::Timeout
                } else if e.is_connect() {
                    TranscriptionError::network("connection failed")
                } else {
                    TranscriptionError::network(e.to_string())
                }
            })?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .map_err(|e| TranscriptionError::network(e.to_string()))?;

        if !status.is_success() {
            return Err(Self::status_error(status, &response_body));
        }

        let parsed: TranscriptResponse = serde_json::from_str(&response_body).map_err(|e| {
            TranscriptionError::invalid_response(format!("failed to parse response: {e}"))
        })?;

        Ok(parsed.text)
    }

    fn name(&self) -> &'static str {
        "openai"
    }

    fn is_simulation(&self) -> bool {
        false
    }
}

// =============================================================================
// Tests
// =============================================================================
