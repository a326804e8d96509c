//! Memory Vault - The Session's Collection of Memory Entries
//!
//! `TigerStyle`: Explicit state, validation at the boundary, no I/O.
//!
//! The vault is an insertion-ordered map from [`EntryId`] to
//! [`MemoryEntry`]. Entries are added once, mutated only by the attach
//! operations during the capture workflow, and never deleted for the life
//! of the session.
//!
//! # Usage
//!
//! ```rust
//! use echodraft::vault::Vault;
//! use echodraft::reflection::Persona;
//! use echodraft::tagging::TagRecord;
//!
//! let mut vault = Vault::new();
//! let id = vault.create("First day of school", Persona::Therapist).unwrap();
//! vault.attach_follow_up(&id, "Why did that day matter?").unwrap();
//! vault.attach_response(&id, "I felt proud").unwrap();
//! vault.attach_tags(&id, TagRecord::new("pride").with_themes(["childhood"])).unwrap();
//!
//! assert!(vault.get(&id).unwrap().is_complete());
//! ```

mod entry;
mod error;

pub use entry::{EntryId, MemoryEntry};
pub use error::{VaultError, VaultResult};

use std::collections::HashMap;

use crate::constants::{FOLLOW_UP_BYTES_MAX, MEMORY_TEXT_BYTES_MAX, RESPONSE_BYTES_MAX};
use crate::reflection::Persona;
use crate::tagging::TagRecord;

// =============================================================================
// Vault
// =============================================================================

/// In-memory collection of memory entries, keyed by id.
///
/// `TigerStyle`: The entry map and the insertion-order vector move
/// together; every mutation maintains `entries.len() == insertion.len()`.
#[derive(Debug, Default)]
pub struct Vault {
    entries: HashMap<EntryId, MemoryEntry>,
    insertion: Vec<EntryId>,
}

impl Vault {
    /// Create an empty vault.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entry with text and persona.
    ///
    /// Derived fields (follow-up, response, tags) start unset.
    ///
    /// # Errors
    /// Returns `VaultError::EmptyText` if the text is blank and
    /// `VaultError::TextTooLong` above the size limit.
    pub fn create(&mut self, text: &str, persona: Persona) -> VaultResult<EntryId> {
        // Preconditions
        let text = text.trim();
        if text.is_empty() {
            return Err(VaultError::EmptyText);
        }
        if text.len() > MEMORY_TEXT_BYTES_MAX {
            return Err(VaultError::TextTooLong {
                len: text.len(),
                max: MEMORY_TEXT_BYTES_MAX,
            });
        }

        let id = EntryId::new();
        let entry = MemoryEntry::new(id.clone(), text.to_string(), persona);
        self.entries.insert(id.clone(), entry);
        self.insertion.push(id.clone());

        // Postcondition
        debug_assert_eq!(
            self.entries.len(),
            self.insertion.len(),
            "entry map and insertion order must stay in sync"
        );

        Ok(id)
    }

    /// Attach the generated follow-up to an entry.
    ///
    /// # Errors
    /// Returns `VaultError::NotFound` for unknown ids and
    /// `VaultError::EmptyFollowUp` for blank text.
    pub fn attach_follow_up(&mut self, id: &EntryId, text: &str) -> VaultResult<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(VaultError::EmptyFollowUp);
        }
        if text.len() > FOLLOW_UP_BYTES_MAX {
            return Err(VaultError::TextTooLong {
                len: text.len(),
                max: FOLLOW_UP_BYTES_MAX,
            });
        }

        let entry = self.entry_mut(id)?;
        entry.follow_up = Some(text.to_string());
        Ok(())
    }

    /// Attach the user's reply to an entry. The reply may be empty.
    ///
    /// # Errors
    /// Returns `VaultError::NotFound` for unknown ids.
    pub fn attach_response(&mut self, id: &EntryId, text: &str) -> VaultResult<()> {
        if text.len() > RESPONSE_BYTES_MAX {
            return Err(VaultError::TextTooLong {
                len: text.len(),
                max: RESPONSE_BYTES_MAX,
            });
        }

        let entry = self.entry_mut(id)?;
        entry.user_response = Some(text.to_string());
        Ok(())
    }

    /// Attach a validated tag record to an entry.
    ///
    /// # Errors
    /// Returns `VaultError::NotFound` for unknown ids and
    /// `VaultError::InvalidTags` if the record fails validation; the entry's
    /// tags stay unset in that case.
    pub fn attach_tags(&mut self, id: &EntryId, tags: TagRecord) -> VaultResult<()> {
        // Validate before touching the entry
        tags.validate()
            .map_err(|e| VaultError::invalid_tags(e.to_string()))?;

        let entry = self.entry_mut(id)?;
        entry.tags = Some(tags);
        Ok(())
    }

    /// Get an entry by id.
    ///
    /// # Errors
    /// Returns `VaultError::NotFound` for unknown ids.
    pub fn get(&self, id: &EntryId) -> VaultResult<&MemoryEntry> {
        self.entries
            .get(id)
            .ok_or_else(|| VaultError::not_found(id.as_str()))
    }

    /// Whether an entry with this id exists.
    #[must_use]
    pub fn contains(&self, id: &EntryId) -> bool {
        self.entries.contains_key(id)
    }

    /// Iterate all entries in insertion order. Stable across calls.
    pub fn all(&self) -> impl Iterator<Item = &MemoryEntry> {
        // Invariant: every id in `insertion` has an entry in the map
        self.insertion.iter().filter_map(|id| self.entries.get(id))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the vault is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, id: &EntryId) -> VaultResult<&mut MemoryEntry> {
        self.entries
            .get_mut(id)
            .ok_or_else(|| VaultError::not_found(id.as_str()))
    }
}

// =============================================================================
// Tests
// =============================================================================
