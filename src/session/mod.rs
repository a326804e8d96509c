//! Session Controller - The Capture Workflow Orchestrator
//!
//! `TigerStyle`: Sim-first, explicit state machine, atomic commit.
//!
//! # Overview
//!
//! The Session owns the vault and timeline for one interactive sitting and
//! drives the capture workflow:
//!
//! ```text
//! Drafting -> AwaitingReply -> AwaitingTags -> Saved
//! ```
//!
//! Adapter calls are awaited before any state transition, and a failed call
//! leaves the draft exactly where it was. The vault gains an entry only in
//! `save()`, once text, persona, follow-up, response, and tags are all
//! known-good together; a failed tag extraction never creates an entry.
//!
//! # Example
//!
//! ```rust
//! use echodraft::session::Session;
//! use echodraft::reflection::Persona;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut session = Session::sim(42);
//!
//!     session
//!         .begin_draft("We drove to the coast at dawn.", Persona::Friend)
//!         .unwrap();
//!     session.request_follow_up().await.unwrap();
//!     session.submit_response("It was the last trip we took.").unwrap();
//!     let id = session.save().await.unwrap();
//!
//!     assert_eq!(session.current_order(), [id]);
//! }
//! ```

mod config;

pub use config::SessionConfig;

use std::collections::BTreeSet;

use crate::constants::{MEMORY_TEXT_BYTES_MAX, RESPONSE_BYTES_MAX};
use crate::llm::LLMProvider;
use crate::reflection::{FollowUpGenerator, Persona, ReflectionError};
use crate::tagging::{TagError, TagExtractor};
use crate::timeline::{Timeline, TimelineError};
use crate::transcription::{
    SimTranscriptionProvider, TranscriptionError, TranscriptionProvider,
};
use crate::vault::{EntryId, MemoryEntry, Vault, VaultError};

// =============================================================================
// Error Types
// =============================================================================

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Draft text (typed or transcribed) is empty
    #[error("memory text is empty")]
    EmptyText,

    /// Draft text exceeds the size limit
    #[error("memory text too long: {len} bytes (max {max})")]
    TextTooLong {
        /// Actual length
        len: usize,
        /// Maximum allowed
        max: usize,
    },

    /// The reply exceeds the size limit
    #[error("response too long: {len} bytes (max {max})")]
    ResponseTooLong {
        /// Actual length
        len: usize,
        /// Maximum allowed
        max: usize,
    },

    /// An unsaved draft already exists
    #[error("a draft is already in progress")]
    DraftInProgress,

    /// No draft exists
    #[error("no draft in progress")]
    NoDraft,

    /// The operation is not valid in the draft's current state
    #[error("invalid state: expected {expected}, draft is {actual}")]
    InvalidState {
        /// State the operation requires
        expected: DraftState,
        /// State the draft is in
        actual: DraftState,
    },

    /// The transcription adapter failed
    #[error("transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    /// The follow-up adapter failed
    #[error("follow-up generation failed: {0}")]
    FollowUp(#[from] ReflectionError),

    /// The tag extraction adapter failed
    #[error("tag extraction failed: {0}")]
    Tagging(#[from] TagError),

    /// A vault operation failed
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// A timeline operation failed
    #[error(transparent)]
    Timeline(#[from] TimelineError),
}

// =============================================================================
// Draft State Machine
// =============================================================================

/// State of the memory currently being captured.
///
/// The adapter-call periods (follow-up requested, tags requested) have no
/// observable state of their own: calls are awaited to completion before
/// any transition, so a failed call leaves the draft in its prior state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    /// Text captured, reflection not yet requested
    Drafting,
    /// Follow-up present, waiting for the user's reply
    AwaitingReply,
    /// Reply submitted, waiting for tag extraction and save
    AwaitingTags,
    /// Committed to the vault and timeline; terminal for this draft
    Saved,
}

impl std::fmt::Display for DraftState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DraftState::Drafting => "drafting",
            DraftState::AwaitingReply => "awaiting_reply",
            DraftState::AwaitingTags => "awaiting_tags",
            DraftState::Saved => "saved",
        };
        write!(f, "{name}")
    }
}

/// The memory being captured, held outside the vault until it commits.
#[derive(Debug, Clone)]
struct Draft {
    text: String,
    persona: Persona,
    follow_up: Option<String>,
    user_response: Option<String>,
    state: DraftState,
    saved_id: Option<EntryId>,
}

// =============================================================================
// Session
// =============================================================================

/// One interactive memoir session.
///
/// Owns the vault, the timeline, the adapter clients, and at most one
/// active draft. Constructed empty, discarded at session end; never shared
/// across sessions.
///
/// # Type Parameters
/// - `L`: LLM provider for follow-up generation and tag extraction
///   ([`SimLLMProvider`](crate::llm::SimLLMProvider) for testing)
/// - `T`: transcription provider for spoken capture
pub struct Session<L: LLMProvider, T: TranscriptionProvider> {
    vault: Vault,
    timeline: Timeline,
    reflector: FollowUpGenerator<L>,
    tagger: TagExtractor<L>,
    transcriber: T,
    draft: Option<Draft>,
}

impl Session<crate::llm::SimLLMProvider, SimTranscriptionProvider> {
    /// Create an all-simulation session with the given seed.
    ///
    /// Deterministic: the same seed and inputs produce the same follow-ups
    /// and tags (entry ids are freshly allocated UUIDs).
    #[must_use]
    pub fn sim(seed: u64) -> Self {
        Self::new(
            crate::llm::SimLLMProvider::with_seed(seed),
            SimTranscriptionProvider::with_seed(seed),
        )
    }
}

impl<L: LLMProvider + Clone, T: TranscriptionProvider> Session<L, T> {
    /// Create a session with the given providers and default configuration.
    #[must_use]
    pub fn new(llm: L, transcriber: T) -> Self {
        Self::with_config(llm, transcriber, SessionConfig::default())
    }

    /// Create a session with explicit configuration.
    #[must_use]
    pub fn with_config(llm: L, transcriber: T, config: SessionConfig) -> Self {
        let mut reflector =
            FollowUpGenerator::new(llm.clone()).with_max_tokens(config.follow_up_max_tokens);
        if let Some(temperature) = config.follow_up_temperature {
            reflector = reflector.with_temperature(temperature);
        }
        let tagger = TagExtractor::new(llm).with_max_tokens(config.tag_max_tokens);

        Self {
            vault: Vault::new(),
            timeline: Timeline::new(),
            reflector,
            tagger,
            transcriber,
            draft: None,
        }
    }
}

impl<L: LLMProvider, T: TranscriptionProvider> Session<L, T> {
    // =========================================================================
    // Capture Workflow
    // =========================================================================

    /// Start a draft from typed text.
    ///
    /// # Errors
    /// Returns `SessionError::EmptyText` for blank text,
    /// `SessionError::TextTooLong` above the size limit, and
    /// `SessionError::DraftInProgress` if an unsaved draft exists.
    pub fn begin_draft(&mut self, text: &str, persona: Persona) -> Result<(), SessionError> {
        if matches!(&self.draft, Some(d) if d.state != DraftState::Saved) {
            return Err(SessionError::DraftInProgress);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyText);
        }
        if text.len() > MEMORY_TEXT_BYTES_MAX {
            return Err(SessionError::TextTooLong {
                len: text.len(),
                max: MEMORY_TEXT_BYTES_MAX,
            });
        }

        tracing::debug!(persona = %persona, text_len = text.len(), "draft started");
        self.draft = Some(Draft {
            text: text.to_string(),
            persona,
            follow_up: None,
            user_response: None,
            state: DraftState::Drafting,
            saved_id: None,
        });
        Ok(())
    }

    /// Start a draft by transcribing captured audio.
    ///
    /// A failed or silent transcription starts no draft.
    ///
    /// # Errors
    /// Returns `SessionError::Transcription` if the adapter fails and
    /// `SessionError::EmptyText` if the transcript is empty (silence).
    pub async fn begin_draft_from_audio(
        &mut self,
        audio: &[u8],
        persona: Persona,
    ) -> Result<(), SessionError> {
        if matches!(&self.draft, Some(d) if d.state != DraftState::Saved) {
            return Err(SessionError::DraftInProgress);
        }

        let transcript = self.transcriber.transcribe(audio).await?;
        self.begin_draft(&transcript, persona)
    }

    /// Abandon the active draft.
    ///
    /// # Errors
    /// Returns `SessionError::NoDraft` if there is nothing to discard.
    pub fn discard_draft(&mut self) -> Result<(), SessionError> {
        if self.draft.take().is_none() {
            return Err(SessionError::NoDraft);
        }
        tracing::debug!("draft discarded");
        Ok(())
    }

    /// Ask the persona for reflective follow-up questions.
    ///
    /// On success the draft moves to `AwaitingReply`. On adapter failure the
    /// draft stays in `Drafting` with its text intact.
    ///
    /// # Errors
    /// Returns `SessionError::FollowUp` on adapter failure and state errors
    /// for out-of-order calls.
    pub async fn request_follow_up(&mut self) -> Result<(), SessionError> {
        let (text, persona) = {
            let draft = self.draft_in(DraftState::Drafting)?;
            (draft.text.clone(), draft.persona)
        };

        let follow_up = self.reflector.generate(&text, persona).await?;

        let draft = self.draft_mut_in(DraftState::Drafting)?;
        draft.follow_up = Some(follow_up);
        draft.state = DraftState::AwaitingReply;
        tracing::debug!(persona = %persona, "follow-up attached");
        Ok(())
    }

    /// Submit the user's reply to the follow-up. The reply may be empty.
    ///
    /// # Errors
    /// Returns state errors for out-of-order calls (the follow-up must
    /// already be present).
    pub fn submit_response(&mut self, text: &str) -> Result<(), SessionError> {
        if text.len() > RESPONSE_BYTES_MAX {
            return Err(SessionError::ResponseTooLong {
                len: text.len(),
                max: RESPONSE_BYTES_MAX,
            });
        }
        let draft = self.draft_mut_in(DraftState::AwaitingReply)?;

        // Invariant: AwaitingReply implies a non-empty follow-up
        debug_assert!(
            draft.follow_up.as_ref().is_some_and(|f| !f.is_empty()),
            "awaiting reply without a follow-up"
        );

        draft.user_response = Some(text.to_string());
        draft.state = DraftState::AwaitingTags;
        Ok(())
    }

    /// Extract tags and commit the draft to the vault and timeline.
    ///
    /// The commit is atomic: a failed extraction leaves the draft in
    /// `AwaitingTags` for a user-initiated retry and creates no vault
    /// entry. On success the draft is `Saved` and the new id is appended to
    /// the timeline.
    ///
    /// # Errors
    /// Returns `SessionError::Tagging` on adapter failure and state errors
    /// for out-of-order calls.
    pub async fn save(&mut self) -> Result<EntryId, SessionError> {
        let (text, persona, follow_up, response) = {
            let draft = self.draft_in(DraftState::AwaitingTags)?;
            (
                draft.text.clone(),
                draft.persona,
                draft.follow_up.clone().unwrap_or_default(),
                draft.user_response.clone().unwrap_or_default(),
            )
        };

        // Adapter call first: nothing is committed unless it succeeds
        let tags = self.tagger.extract(&text).await?;

        let id = self.vault.create(&text, persona)?;
        self.vault.attach_follow_up(&id, &follow_up)?;
        self.vault.attach_response(&id, &response)?;
        self.vault.attach_tags(&id, tags)?;
        self.timeline.append(id.clone(), &self.vault)?;

        let draft = self.draft_mut_in(DraftState::AwaitingTags)?;
        draft.state = DraftState::Saved;
        draft.saved_id = Some(id.clone());
        tracing::debug!(id = %id, "memory saved");

        // Postcondition: the committed entry is complete and visible
        debug_assert!(self.vault.get(&id).is_ok_and(MemoryEntry::is_complete));

        Ok(id)
    }

    /// The active draft's state, if a draft exists.
    #[must_use]
    pub fn draft_state(&self) -> Option<DraftState> {
        self.draft.as_ref().map(|d| d.state)
    }

    /// The id of the most recently saved draft, if any.
    #[must_use]
    pub fn last_saved(&self) -> Option<&EntryId> {
        self.draft
            .as_ref()
            .filter(|d| d.state == DraftState::Saved)
            .and_then(|d| d.saved_id.as_ref())
    }

    // =========================================================================
    // Browse
    // =========================================================================

    /// Iterate saved entries in vault insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &MemoryEntry> {
        self.vault.all()
    }

    /// Get a saved entry by id.
    ///
    /// # Errors
    /// Returns `SessionError::Vault` for unknown ids.
    pub fn entry(&self, id: &EntryId) -> Result<&MemoryEntry, SessionError> {
        Ok(self.vault.get(id)?)
    }

    /// The timeline's full ordering.
    #[must_use]
    pub fn current_order(&self) -> &[EntryId] {
        self.timeline.current_order()
    }

    /// Filter the timeline by themes; the result is the scope for the next
    /// [`Session::reorder`] call.
    pub fn filter_by_themes(&mut self, themes: &BTreeSet<String>) -> Vec<EntryId> {
        self.timeline.filter_by_themes(themes, &self.vault)
    }

    /// Reorder the last filtered subset.
    ///
    /// # Errors
    /// Returns `SessionError::Timeline` if the proposed order is not a
    /// permutation of the last filter result.
    pub fn reorder(&mut self, new_order: &[EntryId]) -> Result<(), SessionError> {
        Ok(self.timeline.reorder(new_order)?)
    }

    /// The sorted union of themes across all saved entries.
    ///
    /// This is what a filter control offers the user.
    #[must_use]
    pub fn all_themes(&self) -> Vec<String> {
        let themes: BTreeSet<&String> = self
            .vault
            .all()
            .filter_map(|entry| entry.tags.as_ref())
            .flat_map(|tags| tags.themes.iter())
            .collect();
        themes.into_iter().cloned().collect()
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn draft_in(&self, expected: DraftState) -> Result<&Draft, SessionError> {
        match &self.draft {
            None => Err(SessionError::NoDraft),
            Some(draft) if draft.state == expected => Ok(draft),
            Some(draft) => Err(SessionError::InvalidState {
                expected,
                actual: draft.state,
            }),
        }
    }

    fn draft_mut_in(&mut self, expected: DraftState) -> Result<&mut Draft, SessionError> {
        match &mut self.draft {
            None => Err(SessionError::NoDraft),
            Some(draft) => {
                if draft.state == expected {
                    Ok(draft)
                } else {
                    Err(SessionError::InvalidState {
                        expected,
                        actual: draft.state,
                    })
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::SimLLMProvider;
    use crate::sim::{DeterministicRng, FaultConfig, FaultInjector, FaultType};
    use std::sync::Arc;

    const MEMORY: &str = "I met Ms. Lee at Lincoln School in Portland last summer.";

    fn faulty_llm_session(fault: FaultType) -> Session<SimLLMProvider, SimTranscriptionProvider> {
        let mut injector = FaultInjector::new(DeterministicRng::new(42));
        injector.register(FaultConfig::new(fault, 1.0));
        Session::new(
            SimLLMProvider::with_faults(42, Arc::new(injector)),
            SimTranscriptionProvider::with_seed(42),
        )
    }

    #[tokio::test]
    async fn test_full_capture_cycle() {
        let mut session = Session::sim(42);

        session.begin_draft(MEMORY, Persona::Therapist).unwrap();
        assert_eq!(session.draft_state(), Some(DraftState::Drafting));

        session.request_follow_up().await.unwrap();
        assert_eq!(session.draft_state(), Some(DraftState::AwaitingReply));

        session.submit_response("I felt proud.").unwrap();
        assert_eq!(session.draft_state(), Some(DraftState::AwaitingTags));

        let id = session.save().await.unwrap();
        assert_eq!(session.draft_state(), Some(DraftState::Saved));
        assert_eq!(session.last_saved(), Some(&id));

        let entry = session.entry(&id).unwrap();
        assert_eq!(entry.text, MEMORY);
        assert!(entry.is_complete());
        assert_eq!(session.current_order(), [id]);
    }

    #[tokio::test]
    async fn test_empty_draft_rejected() {
        let mut session = Session::sim(42);
        let result = session.begin_draft("   ", Persona::Friend);
        assert!(matches!(result, Err(SessionError::EmptyText)));
        assert!(session.draft_state().is_none());
    }

    #[tokio::test]
    async fn test_oversized_draft_rejected() {
        let mut session = Session::sim(42);
        let text = "x".repeat(crate::constants::MEMORY_TEXT_BYTES_MAX + 1);
        let result = session.begin_draft(&text, Persona::Friend);
        assert!(matches!(result, Err(SessionError::TextTooLong { .. })));
        assert!(session.draft_state().is_none());
    }

    #[tokio::test]
    async fn test_oversized_response_rejected() {
        let mut session = Session::sim(42);
        session.begin_draft(MEMORY, Persona::Friend).unwrap();
        session.request_follow_up().await.unwrap();

        let reply = "x".repeat(crate::constants::RESPONSE_BYTES_MAX + 1);
        let result = session.submit_response(&reply);
        assert!(matches!(result, Err(SessionError::ResponseTooLong { .. })));
        assert_eq!(session.draft_state(), Some(DraftState::AwaitingReply));
    }

    #[tokio::test]
    async fn test_second_draft_blocked_until_saved() {
        let mut session = Session::sim(42);
        session.begin_draft(MEMORY, Persona::Friend).unwrap();

        let result = session.begin_draft("another memory", Persona::Friend);
        assert!(matches!(result, Err(SessionError::DraftInProgress)));
    }

    #[tokio::test]
    async fn test_new_draft_allowed_after_save() {
        let mut session = Session::sim(42);
        session.begin_draft(MEMORY, Persona::Friend).unwrap();
        session.request_follow_up().await.unwrap();
        session.submit_response("").unwrap();
        session.save().await.unwrap();

        session.begin_draft("another memory of the coast", Persona::Skeptic).unwrap();
        assert_eq!(session.draft_state(), Some(DraftState::Drafting));
    }

    #[tokio::test]
    async fn test_discard_draft() {
        let mut session = Session::sim(42);
        session.begin_draft(MEMORY, Persona::Friend).unwrap();
        session.discard_draft().unwrap();
        assert!(session.draft_state().is_none());

        assert!(matches!(
            session.discard_draft(),
            Err(SessionError::NoDraft)
        ));
    }

    #[tokio::test]
    async fn test_draft_from_audio() {
        let mut session = Session::sim(42);
        session
            .begin_draft_from_audio(MEMORY.as_bytes(), Persona::Editor)
            .await
            .unwrap();

        assert_eq!(session.draft_state(), Some(DraftState::Drafting));
    }

    #[tokio::test]
    async fn test_silent_audio_starts_no_draft() {
        let mut session = Session::sim(42);
        let result = session
            .begin_draft_from_audio(&[0u8; 64], Persona::Editor)
            .await;

        assert!(matches!(result, Err(SessionError::EmptyText)));
        assert!(session.draft_state().is_none());
    }

    #[tokio::test]
    async fn test_failed_follow_up_keeps_draft_in_drafting() {
        let mut session = faulty_llm_session(FaultType::LlmTimeout);
        session.begin_draft(MEMORY, Persona::Therapist).unwrap();

        let result = session.request_follow_up().await;
        assert!(matches!(result, Err(SessionError::FollowUp(_))));
        assert_eq!(session.draft_state(), Some(DraftState::Drafting));

        // The draft text is never lost on a failed call
        session.discard_draft().unwrap();
    }

    #[tokio::test]
    async fn test_adapter_faults_exhaust_then_retry_succeeds() {
        let mut injector = FaultInjector::new(DeterministicRng::new(42));
        injector.register(FaultConfig::new(FaultType::LlmTimeout, 1.0).with_max_injections(2));
        let mut session = Session::new(
            SimLLMProvider::with_faults(42, Arc::new(injector)),
            SimTranscriptionProvider::with_seed(42),
        );

        session.begin_draft(MEMORY, Persona::Therapist).unwrap();
        // First injection hits the follow-up call; retry once the cap allows
        let _ = session.request_follow_up().await;
        let _ = session.request_follow_up().await;
        session.request_follow_up().await.unwrap();
        session.submit_response("I felt proud.").unwrap();

        let id = session.save().await.unwrap();
        assert_eq!(session.current_order(), [id]);
    }

    #[tokio::test]
    async fn test_failed_tag_extraction_creates_no_entry() {
        let mut injector = FaultInjector::new(DeterministicRng::new(42));
        injector.register(FaultConfig::new(FaultType::LlmMalformedJson, 1.0));
        let llm = SimLLMProvider::with_faults(42, Arc::new(injector));

        let mut session = Session::new(llm, SimTranscriptionProvider::with_seed(42));
        session.begin_draft(MEMORY, Persona::Therapist).unwrap();
        // The malformed-json fault also hits the follow-up call: the sim
        // returns prose, which is a perfectly usable follow-up
        session.request_follow_up().await.unwrap();
        session.submit_response("I felt proud.").unwrap();

        let result = session.save().await;
        assert!(matches!(result, Err(SessionError::Tagging(_))));

        // Atomicity: nothing committed, draft still retryable
        assert!(session.entries().next().is_none());
        assert!(session.current_order().is_empty());
        assert_eq!(session.draft_state(), Some(DraftState::AwaitingTags));
    }

    #[tokio::test]
    async fn test_out_of_order_calls_rejected() {
        let mut session = Session::sim(42);

        assert!(matches!(
            session.request_follow_up().await,
            Err(SessionError::NoDraft)
        ));
        assert!(matches!(
            session.submit_response("reply"),
            Err(SessionError::NoDraft)
        ));

        session.begin_draft(MEMORY, Persona::Friend).unwrap();
        assert!(matches!(
            session.submit_response("reply"),
            Err(SessionError::InvalidState { .. })
        ));
        assert!(matches!(session.save().await, Err(SessionError::InvalidState { .. })));
        assert_eq!(session.draft_state(), Some(DraftState::Drafting));
    }

    #[tokio::test]
    async fn test_empty_reply_is_allowed() {
        let mut session = Session::sim(42);
        session.begin_draft(MEMORY, Persona::Friend).unwrap();
        session.request_follow_up().await.unwrap();
        session.submit_response("").unwrap();
        let id = session.save().await.unwrap();

        let entry = session.entry(&id).unwrap();
        assert_eq!(entry.user_response.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_all_themes_union() {
        let mut session = Session::sim(42);

        for text in [
            "I met Ms. Lee at Lincoln School in Portland last summer.",
            "We sailed past the lighthouse toward Iceland that evening.",
        ] {
            session.begin_draft(text, Persona::Friend).unwrap();
            session.request_follow_up().await.unwrap();
            session.submit_response("").unwrap();
            session.save().await.unwrap();
        }

        let themes = session.all_themes();
        assert!(!themes.is_empty());
        let mut sorted = themes.clone();
        sorted.sort();
        assert_eq!(themes, sorted, "themes must be sorted");
    }

    #[tokio::test]
    async fn test_determinism_across_sessions() {
        let run = |seed| async move {
            let mut session = Session::sim(seed);
            session.begin_draft(MEMORY, Persona::Therapist).unwrap();
            session.request_follow_up().await.unwrap();
            session.submit_response("I felt proud.").unwrap();
            let id = session.save().await.unwrap();
            let entry = session.entry(&id).unwrap();
            (entry.follow_up.clone(), entry.tags.clone())
        };

        assert_eq!(run(42).await, run(42).await);
    }
}
