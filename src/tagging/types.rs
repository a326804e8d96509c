//! Tagging Types - The Four-Field Tag Record
//!
//! `TigerStyle`: Type-safe decode, explicit validation, no invalid states.
//!
//! The adapter returns free text that must decode into exactly this shape.
//! Missing fields and wrong-typed fields are decode errors; the semantic
//! bounds (non-empty emotion, item limits) live in [`TagRecord::validate`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::constants::{TAG_EMOTION_BYTES_MAX, TAG_ITEMS_COUNT_MAX, TAG_ITEM_BYTES_MAX};

// =============================================================================
// Error Types
// =============================================================================

/// Semantic validation errors for a decoded tag record.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TagRecordError {
    /// Emotion label is empty
    #[error("emotion label is empty")]
    EmptyEmotion,

    /// Emotion label exceeds the size limit
    #[error("emotion label too long: {len} bytes (max {max})")]
    EmotionTooLong {
        /// Actual length
        len: usize,
        /// Maximum allowed
        max: usize,
    },

    /// A tag set holds more items than allowed
    #[error("too many {field}: {count} (max {max})")]
    TooManyItems {
        /// Which set overflowed
        field: &'static str,
        /// Actual count
        count: usize,
        /// Maximum allowed
        max: usize,
    },

    /// A tag set holds an empty item
    #[error("empty item in {field}")]
    EmptyItem {
        /// Which set holds the empty item
        field: &'static str,
    },

    /// A tag item exceeds the size limit
    #[error("item in {field} too long: {len} bytes (max {max})")]
    ItemTooLong {
        /// Which set holds the oversized item
        field: &'static str,
        /// Actual length
        len: usize,
        /// Maximum allowed
        max: usize,
    },
}

// =============================================================================
// TagRecord
// =============================================================================

/// Structured metadata derived from a memory's text.
///
/// All four fields are required on decode. The `themes` field accepts the
/// legacy `tags` key, which earlier prompt vintages asked the model for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    /// People mentioned in the memory
    pub people: BTreeSet<String>,
    /// Places mentioned in the memory
    pub places: BTreeSet<String>,
    /// Short label for the main emotion
    pub emotion: String,
    /// Recurring themes the memory belongs to
    #[serde(alias = "tags")]
    pub themes: BTreeSet<String>,
}

impl TagRecord {
    /// Create a record with just an emotion; fill the sets with the
    /// builder methods.
    #[must_use]
    pub fn new(emotion: impl Into<String>) -> Self {
        Self {
            people: BTreeSet::new(),
            places: BTreeSet::new(),
            emotion: emotion.into(),
            themes: BTreeSet::new(),
        }
    }

    /// Set the people mentioned.
    #[must_use]
    pub fn with_people<I, S>(mut self, people: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.people = people.into_iter().map(Into::into).collect();
        self
    }

    /// Set the places mentioned.
    #[must_use]
    pub fn with_places<I, S>(mut self, places: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.places = places.into_iter().map(Into::into).collect();
        self
    }

    /// Set the themes.
    #[must_use]
    pub fn with_themes<I, S>(mut self, themes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.themes = themes.into_iter().map(Into::into).collect();
        self
    }

    /// Validate semantic bounds.
    ///
    /// # Errors
    /// Returns `TagRecordError` if the emotion is blank or oversized, or any
    /// set overflows its item count or holds a blank/oversized item.
    pub fn validate(&self) -> Result<(), TagRecordError> {
        let emotion = self.emotion.trim();
        if emotion.is_empty() {
            return Err(TagRecordError::EmptyEmotion);
        }
        if emotion.len() > TAG_EMOTION_BYTES_MAX {
            return Err(TagRecordError::EmotionTooLong {
                len: emotion.len(),
                max: TAG_EMOTION_BYTES_MAX,
            });
        }

        for (field, items) in [
            ("people", &self.people),
            ("places", &self.places),
            ("themes", &self.themes),
        ] {
            if items.len() > TAG_ITEMS_COUNT_MAX {
                return Err(TagRecordError::TooManyItems {
                    field,
                    count: items.len(),
                    max: TAG_ITEMS_COUNT_MAX,
                });
            }
            for item in items {
                if item.trim().is_empty() {
                    return Err(TagRecordError::EmptyItem { field });
                }
                if item.len() > TAG_ITEM_BYTES_MAX {
                    return Err(TagRecordError::ItemTooLong {
                        field,
                        len: item.len(),
                        max: TAG_ITEM_BYTES_MAX,
                    });
                }
            }
        }

        Ok(())
    }

    /// Whether any of this record's themes appears in the given set.
    #[must_use]
    pub fn mentions_any_theme(&self, themes: &BTreeSet<String>) -> bool {
        self.themes.iter().any(|theme| themes.contains(theme))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_record() -> TagRecord {
        TagRecord::new("pride")
            .with_people(["Ms. Lee"])
            .with_places(["school"])
            .with_themes(["childhood"])
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(valid_record().validate().is_ok());
    }

    #[test]
    fn test_empty_sets_are_valid() {
        let record = TagRecord::new("calm");
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_empty_emotion_rejected() {
        let record = TagRecord::new("  ");
        assert!(matches!(
            record.validate(),
            Err(TagRecordError::EmptyEmotion)
        ));
    }

    #[test]
    fn test_oversized_emotion_rejected() {
        let record = TagRecord::new("x".repeat(TAG_EMOTION_BYTES_MAX + 1));
        assert!(matches!(
            record.validate(),
            Err(TagRecordError::EmotionTooLong { .. })
        ));
    }

    #[test]
    fn test_blank_item_rejected() {
        let record = TagRecord::new("joy").with_people(["  "]);
        assert!(matches!(
            record.validate(),
            Err(TagRecordError::EmptyItem { field: "people" })
        ));
    }

    #[test]
    fn test_too_many_items_rejected() {
        let themes: Vec<String> = (0..=TAG_ITEMS_COUNT_MAX).map(|i| format!("t{i}")).collect();
        let record = TagRecord::new("joy").with_themes(themes);
        assert!(matches!(
            record.validate(),
            Err(TagRecordError::TooManyItems { field: "themes", .. })
        ));
    }

    #[test]
    fn test_decode_requires_all_fields() {
        let missing_places = r#"{"people":[],"emotion":"joy","themes":[]}"#;
        assert!(serde_json::from_str::<TagRecord>(missing_places).is_err());
    }

    #[test]
    fn test_decode_rejects_wrong_types() {
        let emotion_is_list = r#"{"people":[],"places":[],"emotion":["joy"],"themes":[]}"#;
        assert!(serde_json::from_str::<TagRecord>(emotion_is_list).is_err());
    }

    #[test]
    fn test_decode_accepts_legacy_tags_key() {
        let legacy = r#"{"people":["Ms. Lee"],"places":["school"],"emotion":"pride","tags":["childhood"]}"#;
        let record: TagRecord = serde_json::from_str(legacy).unwrap();
        assert!(record.themes.contains("childhood"));
    }

    #[test]
    fn test_decode_collapses_duplicate_items() {
        let raw = r#"{"people":["Lee","Lee"],"places":[],"emotion":"joy","themes":[]}"#;
        let record: TagRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.people.len(), 1);
    }

    #[test]
    fn test_mentions_any_theme() {
        let record = valid_record();
        let mut filter = BTreeSet::new();
        filter.insert("childhood".to_string());
        assert!(record.mentions_any_theme(&filter));

        let mut other = BTreeSet::new();
        other.insert("travel".to_string());
        assert!(!record.mentions_any_theme(&other));
    }
}
