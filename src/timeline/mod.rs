//! Timeline - User-Curated Ordering Over the Vault
//!
//! `TigerStyle`: Explicit ordering state, validation before mutation.
//!
//! The timeline is an ordered sequence of entry ids, distinct from the
//! vault's insertion order. Invariants:
//!
//! - every id on the timeline exists in the vault (no dangling references)
//! - no duplicate ids
//! - only complete (tagged) entries appear
//! - a reorder is a permutation of the most recent filter result, spliced
//!   back among the untouched ids
//!
//! Filtering never loses data: ids outside the active filter keep their
//! positions through any reorder of the filtered subset.
//!
//! # Usage
//!
//! ```rust
//! use std::collections::BTreeSet;
//! use echodraft::timeline::Timeline;
//! use echodraft::vault::Vault;
//! use echodraft::reflection::Persona;
//! use echodraft::tagging::TagRecord;
//!
//! let mut vault = Vault::new();
//! let id = vault.create("First day of school", Persona::Therapist).unwrap();
//! vault.attach_tags(&id, TagRecord::new("pride").with_themes(["childhood"])).unwrap();
//!
//! let mut timeline = Timeline::new();
//! timeline.append(id.clone(), &vault).unwrap();
//! assert_eq!(timeline.current_order(), [id]);
//! ```

use std::collections::{BTreeSet, HashSet};

use thiserror::Error;

use crate::vault::{EntryId, Vault};

// =============================================================================
// Error Types
// =============================================================================

/// Errors from timeline operations.
#[derive(Debug, Clone, Error)]
pub enum TimelineError {
    /// The id does not exist in the vault
    #[error("entry not found: {id}")]
    NotFound {
        /// Entry id that was not found
        id: String,
    },

    /// The entry exists but has no tags yet
    #[error("entry not yet tagged: {id}")]
    EntryNotTagged {
        /// Entry id that is incomplete
        id: String,
    },

    /// The proposed order is not a permutation of the filtered subset
    #[error("invalid reorder: {message}")]
    InvalidReorder {
        /// What was wrong with the proposed order
        message: String,
    },
}

impl TimelineError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create an invalid reorder error.
    #[must_use]
    pub fn invalid_reorder(message: impl Into<String>) -> Self {
        Self::InvalidReorder {
            message: message.into(),
        }
    }
}

// =============================================================================
// Timeline
// =============================================================================

/// Ordered view over the vault's entries.
///
/// `TigerStyle`: The order vector holds distinct ids only; the filter scope
/// remembers the subset the last `filter_by_themes` call returned, which is
/// the only subset `reorder` will accept.
#[derive(Debug, Default)]
pub struct Timeline {
    order: Vec<EntryId>,
    filter_scope: Vec<EntryId>,
}

impl Timeline {
    /// Create an empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an id to the end of the timeline.
    ///
    /// Idempotent: appending an id that is already present is a no-op.
    ///
    /// # Errors
    /// Returns `TimelineError::NotFound` if the id is not in the vault and
    /// `TimelineError::EntryNotTagged` if the entry is not complete.
    pub fn append(&mut self, id: EntryId, vault: &Vault) -> Result<(), TimelineError> {
        let Ok(entry) = vault.get(&id) else {
            return Err(TimelineError::not_found(id.as_str()));
        };
        if !entry.is_complete() {
            return Err(TimelineError::EntryNotTagged {
                id: id.as_str().to_string(),
            });
        }
        if self.order.contains(&id) {
            return Ok(());
        }

        self.order.push(id);

        // Postcondition: no duplicates
        debug_assert_eq!(
            self.order.iter().collect::<HashSet<_>>().len(),
            self.order.len(),
            "timeline must hold distinct ids"
        );

        Ok(())
    }

    /// The full ordering, unfiltered.
    #[must_use]
    pub fn current_order(&self) -> &[EntryId] {
        &self.order
    }

    /// Number of entries on the timeline.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the timeline is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Filter the current order down to entries whose themes intersect the
    /// given set, preserving relative order.
    ///
    /// An empty theme set applies no filter and returns the full order (no
    /// tags selected means show all). The returned subset becomes the
    /// scope the next [`Timeline::reorder`] call must permute.
    pub fn filter_by_themes(&mut self, themes: &BTreeSet<String>, vault: &Vault) -> Vec<EntryId> {
        let result: Vec<EntryId> = if themes.is_empty() {
            self.order.clone()
        } else {
            self.order
                .iter()
                .filter(|id| {
                    // Invariant: timeline entries exist and carry tags
                    vault
                        .get(id)
                        .ok()
                        .and_then(|entry| entry.tags.as_ref())
                        .is_some_and(|tags| tags.mentions_any_theme(themes))
                })
                .cloned()
                .collect()
        };

        self.filter_scope = result.clone();
        result
    }

    /// Splice a permutation of the active filter scope back into the full
    /// order.
    ///
    /// Ids in the scope take the positions implied by `new_order`'s
    /// sequence; ids outside the scope keep their original positions, so
    /// their relative order and gaps survive. Reordering an empty scope is
    /// a no-op only for an empty `new_order`.
    ///
    /// # Errors
    /// Returns `TimelineError::InvalidReorder` if `new_order` contains an id
    /// outside the scope, misses one from it, or holds a duplicate. The
    /// order is untouched on error.
    pub fn reorder(&mut self, new_order: &[EntryId]) -> Result<(), TimelineError> {
        let scope: HashSet<&EntryId> = self.filter_scope.iter().collect();

        // Validate before any mutation
        if new_order.len() != scope.len() {
            return Err(TimelineError::invalid_reorder(format!(
                "expected {} ids, got {}",
                scope.len(),
                new_order.len()
            )));
        }
        let mut seen: HashSet<&EntryId> = HashSet::with_capacity(new_order.len());
        for id in new_order {
            if !scope.contains(id) {
                return Err(TimelineError::invalid_reorder(format!(
                    "id outside the filtered subset: {id}"
                )));
            }
            if !seen.insert(id) {
                return Err(TimelineError::invalid_reorder(format!("duplicate id: {id}")));
            }
        }

        // Splice: scope members take new_order's sequence, the rest stay put
        let mut replacements = new_order.iter();
        for slot in &mut self.order {
            if scope.contains(slot) {
                // Counts match, so a replacement exists for every scope slot
                if let Some(next) = replacements.next() {
                    *slot = next.clone();
                }
            }
        }

        // Postcondition: still a permutation of the same ids
        debug_assert_eq!(
            self.order.iter().collect::<HashSet<_>>().len(),
            self.order.len(),
            "reorder must preserve distinctness"
        );

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::Persona;
    use crate::tagging::TagRecord;

    fn themes(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(ToString::to_string).collect()
    }

    /// Create a tagged entry with the given themes.
    fn add_entry(vault: &mut Vault, text: &str, entry_themes: &[&str]) -> EntryId {
        let id = vault.create(text, Persona::Friend).unwrap();
        vault
            .attach_tags(&id, TagRecord::new("joy").with_themes(entry_themes.to_vec()))
            .unwrap();
        id
    }

    #[test]
    fn test_append_in_call_order() {
        let mut vault = Vault::new();
        let mut timeline = Timeline::new();

        let a = add_entry(&mut vault, "a", &["childhood"]);
        let b = add_entry(&mut vault, "b", &["travel"]);
        let c = add_entry(&mut vault, "c", &["work"]);

        timeline.append(a.clone(), &vault).unwrap();
        timeline.append(b.clone(), &vault).unwrap();
        timeline.append(c.clone(), &vault).unwrap();

        assert_eq!(timeline.current_order(), [a, b, c]);
    }

    #[test]
    fn test_append_is_idempotent() {
        let mut vault = Vault::new();
        let mut timeline = Timeline::new();

        let a = add_entry(&mut vault, "a", &["childhood"]);
        timeline.append(a.clone(), &vault).unwrap();
        timeline.append(a.clone(), &vault).unwrap();

        assert_eq!(timeline.current_order(), [a]);
    }

    #[test]
    fn test_append_unknown_id_rejected() {
        let vault = Vault::new();
        let mut timeline = Timeline::new();

        let ghost = EntryId::new();
        let result = timeline.append(ghost, &vault);
        assert!(matches!(result, Err(TimelineError::NotFound { .. })));
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_append_untagged_entry_rejected() {
        let mut vault = Vault::new();
        let mut timeline = Timeline::new();

        let id = vault.create("untagged", Persona::Friend).unwrap();
        let result = timeline.append(id, &vault);
        assert!(matches!(result, Err(TimelineError::EntryNotTagged { .. })));
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_empty_filter_returns_full_order() {
        let mut vault = Vault::new();
        let mut timeline = Timeline::new();

        let a = add_entry(&mut vault, "a", &["childhood"]);
        let b = add_entry(&mut vault, "b", &["travel"]);
        timeline.append(a.clone(), &vault).unwrap();
        timeline.append(b.clone(), &vault).unwrap();

        let filtered = timeline.filter_by_themes(&BTreeSet::new(), &vault);
        assert_eq!(filtered, vec![a, b]);
    }

    #[test]
    fn test_filter_by_theme_intersection() {
        let mut vault = Vault::new();
        let mut timeline = Timeline::new();

        let a = add_entry(&mut vault, "a", &["childhood"]);
        let b = add_entry(&mut vault, "b", &["travel"]);
        timeline.append(a, &vault).unwrap();
        timeline.append(b.clone(), &vault).unwrap();

        let filtered = timeline.filter_by_themes(&themes(&["travel"]), &vault);
        assert_eq!(filtered, vec![b]);
    }

    #[test]
    fn test_filter_preserves_relative_order() {
        let mut vault = Vault::new();
        let mut timeline = Timeline::new();

        let a = add_entry(&mut vault, "a", &["sea"]);
        let b = add_entry(&mut vault, "b", &["land"]);
        let c = add_entry(&mut vault, "c", &["sea", "land"]);
        for id in [&a, &b, &c] {
            timeline.append(id.clone(), &vault).unwrap();
        }

        let filtered = timeline.filter_by_themes(&themes(&["sea"]), &vault);
        assert_eq!(filtered, vec![a, c]);
    }

    #[test]
    fn test_filter_on_empty_timeline() {
        let vault = Vault::new();
        let mut timeline = Timeline::new();

        assert!(timeline.filter_by_themes(&BTreeSet::new(), &vault).is_empty());
        assert!(timeline
            .filter_by_themes(&themes(&["anything"]), &vault)
            .is_empty());
    }

    #[test]
    fn test_reorder_full_permutation() {
        let mut vault = Vault::new();
        let mut timeline = Timeline::new();

        let a = add_entry(&mut vault, "a", &["one"]);
        let b = add_entry(&mut vault, "b", &["two"]);
        let c = add_entry(&mut vault, "c", &["three"]);
        for id in [&a, &b, &c] {
            timeline.append(id.clone(), &vault).unwrap();
        }

        timeline.filter_by_themes(&BTreeSet::new(), &vault);
        timeline.reorder(&[c.clone(), a.clone(), b.clone()]).unwrap();

        assert_eq!(timeline.current_order(), [c, a, b]);
    }

    #[test]
    fn test_reorder_splices_around_unfiltered_ids() {
        let mut vault = Vault::new();
        let mut timeline = Timeline::new();

        let a = add_entry(&mut vault, "a", &["sea"]);
        let b = add_entry(&mut vault, "b", &["land"]);
        let c = add_entry(&mut vault, "c", &["sea"]);
        let d = add_entry(&mut vault, "d", &["land"]);
        for id in [&a, &b, &c, &d] {
            timeline.append(id.clone(), &vault).unwrap();
        }

        // Filter picks positions 0 and 2; swapping them must leave b and d
        // exactly where they were.
        let filtered = timeline.filter_by_themes(&themes(&["sea"]), &vault);
        assert_eq!(filtered, vec![a.clone(), c.clone()]);

        timeline.reorder(&[c.clone(), a.clone()]).unwrap();
        assert_eq!(timeline.current_order(), [c, b, a, d]);
    }

    #[test]
    fn test_non_subset_ids_keep_mutual_order_after_clearing_filter() {
        let mut vault = Vault::new();
        let mut timeline = Timeline::new();

        let a = add_entry(&mut vault, "a", &["keep"]);
        let b = add_entry(&mut vault, "b", &["move"]);
        let c = add_entry(&mut vault, "c", &["keep"]);
        let d = add_entry(&mut vault, "d", &["move"]);
        let e = add_entry(&mut vault, "e", &["keep"]);
        for id in [&a, &b, &c, &d, &e] {
            timeline.append(id.clone(), &vault).unwrap();
        }

        timeline.filter_by_themes(&themes(&["move"]), &vault);
        timeline.reorder(&[d.clone(), b.clone()]).unwrap();

        // Clearing the filter shows the non-subset ids in original mutual order
        let full = timeline.filter_by_themes(&BTreeSet::new(), &vault);
        let kept: Vec<&EntryId> = full
            .iter()
            .filter(|id| [&a, &c, &e].contains(id))
            .collect();
        assert_eq!(kept, vec![&a, &c, &e]);
        assert_eq!(full, vec![a, d, c, b, e]);
    }

    #[test]
    fn test_single_element_reorder_is_noop() {
        let mut vault = Vault::new();
        let mut timeline = Timeline::new();

        let a = add_entry(&mut vault, "a", &["childhood"]);
        let b = add_entry(&mut vault, "b", &["travel"]);
        timeline.append(a.clone(), &vault).unwrap();
        timeline.append(b.clone(), &vault).unwrap();

        let filtered = timeline.filter_by_themes(&themes(&["travel"]), &vault);
        assert_eq!(filtered, vec![b.clone()]);
        timeline.reorder(&[b.clone()]).unwrap();

        let full = timeline.filter_by_themes(&BTreeSet::new(), &vault);
        assert_eq!(full, vec![a, b]);
    }

    #[test]
    fn test_reorder_with_extra_id_rejected() {
        let mut vault = Vault::new();
        let mut timeline = Timeline::new();

        let a = add_entry(&mut vault, "a", &["sea"]);
        let b = add_entry(&mut vault, "b", &["land"]);
        timeline.append(a.clone(), &vault).unwrap();
        timeline.append(b.clone(), &vault).unwrap();

        timeline.filter_by_themes(&themes(&["sea"]), &vault);
        let before = timeline.current_order().to_vec();

        let result = timeline.reorder(&[a.clone(), b.clone()]);
        assert!(matches!(result, Err(TimelineError::InvalidReorder { .. })));
        assert_eq!(timeline.current_order(), before, "order must be untouched");
    }

    #[test]
    fn test_reorder_with_missing_id_rejected() {
        let mut vault = Vault::new();
        let mut timeline = Timeline::new();

        let a = add_entry(&mut vault, "a", &["sea"]);
        let b = add_entry(&mut vault, "b", &["sea"]);
        timeline.append(a, &vault).unwrap();
        timeline.append(b.clone(), &vault).unwrap();

        timeline.filter_by_themes(&themes(&["sea"]), &vault);
        let before = timeline.current_order().to_vec();

        let result = timeline.reorder(&[b]);
        assert!(matches!(result, Err(TimelineError::InvalidReorder { .. })));
        assert_eq!(timeline.current_order(), before);
    }

    #[test]
    fn test_reorder_with_duplicate_rejected() {
        let mut vault = Vault::new();
        let mut timeline = Timeline::new();

        let a = add_entry(&mut vault, "a", &["sea"]);
        let b = add_entry(&mut vault, "b", &["sea"]);
        timeline.append(a.clone(), &vault).unwrap();
        timeline.append(b, &vault).unwrap();

        timeline.filter_by_themes(&themes(&["sea"]), &vault);
        let before = timeline.current_order().to_vec();

        let result = timeline.reorder(&[a.clone(), a]);
        assert!(matches!(result, Err(TimelineError::InvalidReorder { .. })));
        assert_eq!(timeline.current_order(), before);
    }

    #[test]
    fn test_reorder_before_any_filter_rejects_nonempty() {
        let mut vault = Vault::new();
        let mut timeline = Timeline::new();

        let a = add_entry(&mut vault, "a", &["sea"]);
        timeline.append(a.clone(), &vault).unwrap();

        // No filter taken yet: only the empty reorder is a no-op
        timeline.reorder(&[]).unwrap();
        let result = timeline.reorder(&[a]);
        assert!(matches!(result, Err(TimelineError::InvalidReorder { .. })));
    }

    #[test]
    fn test_reorder_empty_scope_is_noop() {
        let mut vault = Vault::new();
        let mut timeline = Timeline::new();

        let a = add_entry(&mut vault, "a", &["sea"]);
        timeline.append(a.clone(), &vault).unwrap();

        let filtered = timeline.filter_by_themes(&themes(&["desert"]), &vault);
        assert!(filtered.is_empty());

        timeline.reorder(&[]).unwrap();
        assert_eq!(timeline.current_order(), [a]);
    }

    #[test]
    fn test_append_after_filter_keeps_scope_valid() {
        let mut vault = Vault::new();
        let mut timeline = Timeline::new();

        let a = add_entry(&mut vault, "a", &["sea"]);
        let b = add_entry(&mut vault, "b", &["sea"]);
        timeline.append(a.clone(), &vault).unwrap();
        timeline.append(b.clone(), &vault).unwrap();

        timeline.filter_by_themes(&themes(&["sea"]), &vault);

        // A new entry lands after the scope was taken
        let c = add_entry(&mut vault, "c", &["sea"]);
        timeline.append(c.clone(), &vault).unwrap();

        // The old scope still reorders; the new id stays at the end
        timeline.reorder(&[b.clone(), a.clone()]).unwrap();
        assert_eq!(timeline.current_order(), [b, a, c]);
    }
}
