//! `SimLLMProvider` - Deterministic LLM Simulation
//!
//! `TigerStyle`: Primary implementation. This is the DEFAULT provider for
//! all tests and development; the OpenAI provider is secondary.
//!
//! The provider routes prompts to domain generators: follow-up prompts get
//! reflective questions built from the memory text, tag prompts get a
//! well-formed tag record mined from capitalized tokens and content words.
//! Same seed, same prompt, same output.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use super::{CompletionRequest, LLMProvider, ProviderError};
use crate::constants::{LLM_PROMPT_BYTES_MAX, LLM_RESPONSE_BYTES_MAX};
use crate::sim::{DeterministicRng, FaultInjector, FaultType};

/// Emotion labels the simulated extractor chooses from.
const SIM_EMOTIONS: &[&str] = &[
    "joy",
    "pride",
    "nostalgia",
    "wonder",
    "grief",
    "calm",
    "longing",
];

/// Question templates for simulated follow-ups. `{subject}` is replaced
/// with the first proper noun found in the memory text.
const SIM_QUESTION_TEMPLATES: &[&str] = &[
    "What do you remember most vividly about {subject}?",
    "How did that moment change the way you saw yourself?",
    "Who else was there, and what were they doing?",
    "What would you say to {subject} if you could go back?",
    "What sounds or smells bring that day back to you?",
];

/// Prepositions that mark the following proper noun as a place.
const PLACE_PREPOSITIONS: &[&str] = &["at", "in", "into", "near", "from", "around"];

/// Simulated LLM provider.
///
/// `TigerStyle`:
/// - Deterministic responses via seeded RNG
/// - Prompt routing to domain-specific generators
/// - Fault injection integration
/// - Thread-safe via `Mutex` for use in async contexts
///
/// # Example
///
/// ```rust
/// use echodraft::llm::{SimLLMProvider, CompletionRequest, LLMProvider};
///
/// #[tokio::main]
/// async fn main() {
///     let provider = SimLLMProvider::with_seed(42);
///     let provider2 = SimLLMProvider::with_seed(42);
///
///     let request = CompletionRequest::new(
///         "Memory:\nWe met Alice at the harbor.\n\nAsk 2\u{2013}3 thoughtful follow-up questions.",
///     );
///     let a = provider.complete(&request).await.unwrap();
///     let b = provider2.complete(&request).await.unwrap();
///     assert_eq!(a, b);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SimLLMProvider {
    rng: Arc<Mutex<DeterministicRng>>,
    faults: Arc<FaultInjector>,
    seed: u64,
}

impl SimLLMProvider {
    /// Create a new standalone `SimLLMProvider` with the given seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Arc::new(Mutex::new(DeterministicRng::new(seed))),
            faults: Arc::new(FaultInjector::new(DeterministicRng::new(seed))),
            seed,
        }
    }

    /// Create a new `SimLLMProvider` with fault injection.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use echodraft::llm::SimLLMProvider;
    /// use echodraft::sim::{DeterministicRng, FaultConfig, FaultInjector, FaultType};
    ///
    /// let mut injector = FaultInjector::new(DeterministicRng::new(42));
    /// injector.register(FaultConfig::new(FaultType::LlmTimeout, 1.0));
    /// let provider = SimLLMProvider::with_faults(42, Arc::new(injector));
    /// ```
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

    /// Route a prompt to the matching generator.
    fn route_prompt(&self, prompt: &str) -> String {
        let prompt_lower = prompt.to_lowercase();

        if prompt_lower.contains("follow-up questions") {
            self.sim_follow_up(prompt)
        } else if prompt_lower.contains("\"themes\"") {
            self.sim_tag_record(prompt)
        } else {
            self.sim_generic()
        }
    }

    /// Generate 2-3 reflective questions about the memory text.
    fn sim_follow_up(&self, prompt: &str) -> String {
        let text = memory_text_from_prompt(prompt);
        let subject = proper_noun_runs(&text)
            .into_iter()
            .next()
            .map_or_else(|| "that moment".to_string(), |run| run.words.join(" "));

        let mut rng = self.rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let count = rng.next_usize(2, 3);
        let start = rng.next_usize(0, SIM_QUESTION_TEMPLATES.len() - 1);

        (0..count)
            .map(|i| {
                let template = SIM_QUESTION_TEMPLATES[(start + i) % SIM_QUESTION_TEMPLATES.len()];
                template.replace("{subject}", &subject)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Generate a well-formed tag record mined from the memory text.
    fn sim_tag_record(&self, prompt: &str) -> String {
        let text = memory_text_from_prompt(prompt);

        let mut people = BTreeSet::new();
        let mut places = BTreeSet::new();
        for run in proper_noun_runs(&text) {
            let name = run.words.join(" ");
            if run.after_place_preposition {
                places.insert(name);
            } else {
                people.insert(name);
            }
        }

        let named: BTreeSet<String> = people
            .iter()
            .chain(places.iter())
            .flat_map(|name| name.split_whitespace())
            .map(str::to_lowercase)
            .collect();

        let mut themes: Vec<String> = Vec::new();
        for token in text.split_whitespace() {
            let word = clean_token(token).to_lowercase();
            if word.len() >= 6
                && word.chars().all(char::is_alphabetic)
                && !named.contains(&word)
                && !themes.contains(&word)
            {
                themes.push(word);
            }
            if themes.len() == 2 {
                break;
            }
        }
        if themes.is_empty() {
            themes.push("memory".to_string());
        }

        let mut rng = self.rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let emotion = *rng.choose(SIM_EMOTIONS);

        json!({
            "people": people,
            "places": places,
            "emotion": emotion,
            "themes": themes,
        })
        .to_string()
    }

    /// Generic response for prompts outside the known domains.
    fn sim_generic(&self) -> String {
        json!({
            "response": "Acknowledged.",
            "success": true,
        })
        .to_string()
    }
}

#[async_trait]
impl LLMProvider for SimLLMProvider {
    #[tracing::instrument(skip(self, request), fields(prompt_len = request.prompt.len()))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        // Preconditions (CompletionRequest::new already enforces these)
        debug_assert!(!request.prompt.is_empty(), "prompt must not be empty");
        if request.prompt.len() > LLM_PROMPT_BYTES_MAX {
            return Err(ProviderError::context_overflow(request.prompt.len()));
        }

        if let Some(fault) = self.faults.should_inject("llm_complete") {
            match fault {
                FaultType::LlmTimeout => return Err(ProviderError::Timeout),
                FaultType::LlmRateLimit => return Err(ProviderError::rate_limit(None)),
                FaultType::LlmUnavailable => {
                    return Err(ProviderError::unavailable("simulated outage"))
                }
                FaultType::LlmInvalidResponse => {
                    return Err(ProviderError::invalid_response("simulated unusable response"))
                }
                // The call succeeds but the payload is not the requested JSON.
                FaultType::LlmMalformedJson => {
                    return Ok("Here are the tags you asked for!".to_string())
                }
                FaultType::TranscriptionTimeout | FaultType::TranscriptionUnavailable => {}
            }
        }

        // Build the full prompt (system + user prompt)
        let full_prompt = match &request.system {
            Some(system) => format!("{}\n\n{}", system, request.prompt),
            None => request.prompt.clone(),
        };

        let response = self.route_prompt(&full_prompt);

        // Postconditions
        debug_assert!(!response.is_empty(), "response must not be empty");
        debug_assert!(
            response.len() <= LLM_RESPONSE_BYTES_MAX,
            "response exceeds limit"
        );

        Ok(response)
    }

    fn name(&self) -> &'static str {
        "sim"
    }

    fn is_simulation(&self) -> bool {
        true
    }
}

// =============================================================================
// Token Analysis
// =============================================================================

/// A run of consecutive capitalized words, e.g. "Ms Lee" or "Lincoln School".
struct ProperNounRun {
    words: Vec<String>,
    after_place_preposition: bool,
}

/// Strip surrounding punctuation from a token.
fn clean_token(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

/// Whether a cleaned token looks like the start of a proper noun.
fn is_capitalized_word(word: &str) -> bool {
    word.len() >= 2
        && word.chars().next().is_some_and(char::is_uppercase)
        && word.chars().skip(1).any(char::is_lowercase)
}

/// Extract the memory text embedded in a follow-up or tag prompt.
///
/// Both prompt templates carry the narrative after a `Memory:` marker and
/// before the instruction block.
fn memory_text_from_prompt(prompt: &str) -> String {
    let Some(start) = prompt.find("Memory:") else {
        return prompt.trim().to_string();
    };
    let rest = &prompt[start + "Memory:".len()..];
    let end = rest
        .find("\n\nAsk")
        .or_else(|| rest.find("\n\nReturn"))
        .unwrap_or(rest.len());
    rest[..end].trim().to_string()
}

/// Find proper-noun runs in free text.
///
/// A single capitalized word at a sentence start is treated as sentence
/// case, not a name. Runs preceded by a place preposition ("at", "in", ...)
/// are flagged so the caller can sort them into places.
fn proper_noun_runs(text: &str) -> Vec<ProperNounRun> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut runs = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let word = clean_token(tokens[i]);
        if !is_capitalized_word(word) {
            i += 1;
            continue;
        }

        let sentence_start = i == 0
            || tokens[i - 1].ends_with(['.', '!', '?']);
        let after_place_preposition = i > 0
            && PLACE_PREPOSITIONS.contains(&clean_token(tokens[i - 1]).to_lowercase().as_str());

        let mut words = Vec::new();
        while i < tokens.len() {
            let next = clean_token(tokens[i]);
            if !is_capitalized_word(next) {
                break;
            }
            words.push(next.to_string());
            i += 1;
        }

        // Sentence-case single words are not names
        if sentence_start && words.len() == 1 && !after_place_preposition {
            continue;
        }
        runs.push(ProperNounRun {
            words,
            after_place_preposition,
        });
    }

    runs
}

// =============================================================================
// Tests
// =============================================================================
