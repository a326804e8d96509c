//! Memory Entry - One Captured Memory and Everything Derived From It
//!
//! `TigerStyle`: Explicit fields, stable identifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reflection::Persona;
use crate::tagging::TagRecord;

// =============================================================================
// EntryId
// =============================================================================

/// Unique, stable identifier for a memory entry.
///
/// Assigned at creation (UUID v4), never reused, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(String);

impl EntryId {
    /// Allocate a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// MemoryEntry
// =============================================================================

/// One captured memory plus its derived follow-up, reply, and tags.
///
/// `TigerStyle`: Option only where absence is a real state. The follow-up,
/// response, and tags are genuinely absent until the matching workflow step
/// attaches them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Unique identifier
    pub id: EntryId,
    /// The raw memory narrative
    pub text: String,
    /// Which reflective viewpoint was used
    pub persona: Persona,
    /// Reflective questions generated for this entry
    pub follow_up: Option<String>,
    /// The user's reply to the follow-up (may be empty)
    pub user_response: Option<String>,
    /// Structured metadata, present only after extraction succeeds
    pub tags: Option<TagRecord>,
    /// When the memory was captured
    pub created_at: DateTime<Utc>,
}

impl MemoryEntry {
    /// Create a new entry with text and persona; derived fields start unset.
    ///
    /// The vault performs text validation before calling this.
    #[must_use]
    pub(crate) fn new(id: EntryId, text: String, persona: Persona) -> Self {
        // Precondition
        debug_assert!(!text.trim().is_empty(), "text must not be empty");

        Self {
            id,
            text,
            persona,
            follow_up: None,
            user_response: None,
            tags: None,
            created_at: Utc::now(),
        }
    }

    /// Whether this entry may appear on the timeline.
    ///
    /// Requires both text and tags to be populated.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.text.is_empty() && self.tags.is_some()
    }
}
