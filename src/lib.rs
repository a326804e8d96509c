//! # EchoDraft
//!
//! A memoir-authoring workspace core: capture a personal memory (typed or
//! transcribed), reflect on it with an LLM persona, extract structured tags,
//! and curate the saved memories on a user-ordered timeline.
//!
//! ## Features
//!
//! - **Capture**: typed text or audio routed through a transcription adapter
//! - **Reflection**: persona-scoped follow-up questions (therapist, editor,
//!   friend, skeptic)
//! - **Strict tagging**: adapter output must decode into the four-field
//!   record (people, places, emotion, themes) or the save fails, never
//!   silently-accepted malformed data
//! - **Timeline curation**: theme filtering and splice-preserving reorder,
//!   so ids outside the active filter never move or get lost
//! - **Deterministic testing**: seeded simulation providers with fault
//!   injection for every adapter failure mode
//!
//! ## Quick Start
//!
//! ```rust
//! use echodraft::session::Session;
//! use echodraft::reflection::Persona;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Deterministic session backed by simulation providers (seed 42)
//!     let mut session = Session::sim(42);
//!
//!     session.begin_draft(
//!         "I met Ms. Lee at Lincoln School in Portland last summer.",
//!         Persona::Therapist,
//!     )?;
//!     session.request_follow_up().await?;
//!     session.submit_response("I felt proud.")?;
//!     let id = session.save().await?;
//!
//!     assert_eq!(session.current_order(), [id]);
//!     Ok(())
//! }
//! ```
//!
//! **Note on simulation providers**: [`Session::sim`](session::Session::sim)
//! returns deterministic placeholder follow-ups and tags mined from the
//! text. For real reflection, construct the session with the production
//! providers behind the `openai` feature.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                   Session Controller                    │
//! │   Drafting → AwaitingReply → AwaitingTags → Saved       │
//! ├───────────────┬──────────────────┬──────────────────────┤
//! │ FollowUpGen   │  TagExtractor    │  TranscriptionProv.  │
//! │ (persona)     │  (strict decode) │  (audio → text)      │
//! ├───────────────┴──────────────────┴──────────────────────┤
//! │  Memory Vault (id → entry)  │  Timeline (curated order) │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The vault gains an entry only when text, persona, follow-up, response,
//! and tags are all known-good together; a failed adapter call leaves prior
//! state untouched and is recoverable by retrying the triggering action.
//!
//! ## Feature Flags
//!
//! - `openai` - production providers for chat completions and audio
//!   transcription

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod constants;
pub mod llm;
pub mod reflection;
pub mod session;
pub mod sim;
pub mod tagging;
pub mod timeline;
pub mod transcription;
pub mod vault;

pub use llm::{CompletionRequest, LLMProvider, ProviderError, SimLLMProvider};
pub use reflection::{FollowUpGenerator, Persona, ReflectionError};
pub use session::{DraftState, Session, SessionConfig, SessionError};
pub use tagging::{TagError, TagExtractor, TagRecord};
pub use timeline::{Timeline, TimelineError};
pub use transcription::{SimTranscriptionProvider, TranscriptionError, TranscriptionProvider};
pub use vault::{EntryId, MemoryEntry, Vault, VaultError};

#[cfg(feature = "openai")]
pub use llm::OpenAIProvider;
#[cfg(feature = "openai")]
pub use transcription::OpenAITranscriptionProvider;
