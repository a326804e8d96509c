//! `OpenAIProvider` - OpenAI Chat Completions Integration
//!
//! `TigerStyle`: Production provider, feature-gated.
//!
//! Requires the `openai` feature flag:
//! ```toml
//! echodraft = { version = "0.1", features = ["openai"] }
//! ```
//!
//! Also supports OpenAI-compatible APIs (Azure, local models, etc.)
//! via `with_base_url`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CompletionRequest, LLMProvider, ProviderError};
use crate::constants::{LLM_PROMPT_BYTES_MAX, LLM_RESPONSE_BYTES_MAX};

// =============================================================================
// Constants
// =============================================================================

/// Default chat completions URL
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default max tokens
const DEFAULT_MAX_TOKENS: usize = 1024;

// =============================================================================
// API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
    code: Option<String>,
}

// =============================================================================
// OpenAIProvider
// =============================================================================

/// OpenAI chat completions provider.
///
/// `TigerStyle`: Production provider with explicit configuration.
///
/// Supports:
/// - OpenAI API (default)
/// - Azure OpenAI (via `with_base_url`)
/// - Local models with OpenAI-compatible APIs (Ollama, vLLM, etc.)
///
/// # Example
///
/// ```rust,ignore
/// use echodraft::llm::{OpenAIProvider, CompletionRequest, LLMProvider};
///
/// #[tokio::main]
/// async fn main() {
///     let provider = OpenAIProvider::new(std::env::var("OPENAI_API_KEY").unwrap());
///
///     let request = CompletionRequest::new("Hello!");
///     let response = provider.complete(&request).await.unwrap();
///     println!("{}", response);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct OpenAIProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_url: String,
}

impl OpenAIProvider {
    /// Create a new `OpenAIProvider` with the given API key.
    ///
    /// Uses the default model (`gpt-4o-mini`).
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Set the model to use.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (Azure, local models, proxies).
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

    /// Get the current API URL.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Build the request body.
    fn build_request(&self, request: &CompletionRequest) -> ChatRequest {
        let mut messages = Vec::new();

        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.prompt.clone(),
        });

        ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: Some(request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)),
            temperature: request.temperature,
            response_format: if request.json_mode {
                Some(ResponseFormat {
                    format_type: "json_object".to_string(),
                })
            } else {
                None
            },
        }
    }

    /// Parse an error response body.
    fn parse_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
        if let Ok(err) = serde_json::from_str::<ApiError>(body) {
            let error_type = err.error.error_type.as_deref().unwrap_or("");
            let code = err.error.code.as_deref().unwrap_or("");

            return match (error_type, code) {
                ("invalid_api_key", _) | (_, "invalid_api_key") => {
                    ProviderError::AuthenticationFailed
                }
                ("rate_limit_exceeded", _) | (_, "rate_limit_exceeded") => {
                    ProviderError::rate_limit(None)
                }
                ("context_length_exceeded", _) | (_, "context_length_exceeded") => {
                    ProviderError::context_overflow(0)
                }
                ("server_error", _) | (_, "server_error") => {
                    ProviderError::unavailable("OpenAI server error")
                }
                _ => ProviderError::invalid_response(err.error.message),
            };
        }

        // Fall back to the status code
        match status {
            reqwest::StatusCode::UNAUTHORIZED => ProviderError::AuthenticationFailed,
            reqwest::StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limit(None),
            reqwest::StatusCode::SERVICE_UNAVAILABLE | reqwest::StatusCode::BAD_GATEWAY => {
                ProviderError::unavailable("OpenAI API unavailable")
            }
            reqwest::StatusCode::REQUEST_TIMEOUT | reqwest::StatusCode::GATEWAY_TIMEOUT => {
                ProviderError::Timeout
            }
            _ => ProviderError::invalid_response(format!("HTTP {status}: {body}")),
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    #[tracing::instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        // Precondition
        debug_assert!(
            request.prompt.len() <= LLM_PROMPT_BYTES_MAX,
            "prompt exceeds limit"
        );

        let body = self.build_request(request);

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else if e.is_connect() {
                    ProviderError::network("connection failed")
                } else {
                    ProviderError::network(e.to_string())
                }
            })?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(e.to_string()))?;

        if !status.is_success() {
            return Err(Self::parse_error(status, &response_body));
        }

        let parsed: ChatResponse = serde_json::from_str(&response_body)
            .map_err(|e| ProviderError::invalid_response(format!("failed to parse response: {e}")))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        // Postcondition
        debug_assert!(
            text.len() <= LLM_RESPONSE_BYTES_MAX,
            "response exceeds limit"
        );

        Ok(text)
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
