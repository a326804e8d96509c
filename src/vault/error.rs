//! Vault Errors
//!
//! `TigerStyle`: Explicit error types with context.

use thiserror::Error;

/// Errors from vault operations.
#[derive(Debug, Clone, Error)]
pub enum VaultError {
    /// Memory text is empty
    #[error("memory text is empty")]
    EmptyText,

    /// Text exceeds the size limit
    #[error("text too long: {len} bytes (max {max})")]
    TextTooLong {
        /// Actual length
        len: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Follow-up text is empty
    #[error("follow-up text is empty")]
    EmptyFollowUp,

    /// Entry not found
    #[error("entry not found: {id}")]
    NotFound {
        /// Entry id that was not found
        id: String,
    },

    /// Tag record failed validation
    #[error("invalid tag record: {message}")]
    InvalidTags {
        /// Validation error message
        message: String,
    },
}

impl VaultError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create an invalid tags error.
    #[must_use]
    pub fn invalid_tags(message: impl Into<String>) -> Self {
        Self::InvalidTags {
            message: message.into(),
        }
    }
}

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_constructors() {
        let err = VaultError::not_found("some-id");
        assert!(matches!(err, VaultError::NotFound { id } if id == "some-id"));

        let err = VaultError::invalid_tags("emotion label is empty");
        assert!(
            matches!(err, VaultError::InvalidTags { message } if message == "emotion label is empty")
        );
    }
}
