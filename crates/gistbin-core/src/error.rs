//! Error types for gist allocation and storage.
//!
//! Validation and allocation errors are per-request values: their `Display`
//! text is what the create endpoint returns to the caller, so the messages
//! are part of the wire contract.

use thiserror::Error;

/// Result type alias using the store error type.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A submitted gist failed a length or presence check.
///
/// Variants are listed in the order the validator checks them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Content was missing or empty.
    #[error("data not provided")]
    ContentRequired,

    /// Name exceeds the configured maximum.
    #[error("name too long (max {max})")]
    NameTooLong {
        /// Configured maximum name length.
        max: usize,
    },

    /// Content exceeds the configured maximum.
    #[error("data too long (max {max})")]
    ContentTooLong {
        /// Configured maximum content length.
        max: usize,
    },

    /// Short code exceeds the configured maximum.
    #[error("Short Url too long (max {max})")]
    CodeTooLong {
        /// Configured maximum short code length.
        max: usize,
    },

    /// Short code is shorter than the configured minimum.
    #[error("Short Url too short (min {min})")]
    CodeTooShort {
        /// Configured minimum short code length.
        min: usize,
    },
}

/// The backing store could not complete an operation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O error (creating the database directory, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store is not reachable or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Why a create request did not produce a code.
#[derive(Error, Debug)]
pub enum AllocationError {
    /// The submission failed validation; the store was not touched.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// A custom code is already in use in the namespace.
    #[error("Url taken!")]
    CodeTaken,

    /// Every generated code collided and no retries remain.
    #[error("Free url not found!")]
    RandomCodeExhausted,

    /// The store failed; the detail is logged, not returned to the caller.
    #[error("storage unavailable")]
    Store(#[from] StoreError),
}

impl AllocationError {
    /// Short label used for metrics and log fields.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Invalid(ValidationError::ContentRequired) => "content_required",
            Self::Invalid(ValidationError::NameTooLong { .. }) => "name_too_long",
            Self::Invalid(ValidationError::ContentTooLong { .. }) => "content_too_long",
            Self::Invalid(ValidationError::CodeTooLong { .. }) => "code_too_long",
            Self::Invalid(ValidationError::CodeTooShort { .. }) => "code_too_short",
            Self::CodeTaken => "code_taken",
            Self::RandomCodeExhausted => "random_code_exhausted",
            Self::Store(_) => "store_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::ContentRequired.to_string(),
            "data not provided"
        );
        assert_eq!(
            ValidationError::NameTooLong { max: 64 }.to_string(),
            "name too long (max 64)"
        );
        assert_eq!(
            ValidationError::ContentTooLong { max: 10 }.to_string(),
            "data too long (max 10)"
        );
        assert_eq!(
            ValidationError::CodeTooLong { max: 128 }.to_string(),
            "Short Url too long (max 128)"
        );
        assert_eq!(
            ValidationError::CodeTooShort { min: 5 }.to_string(),
            "Short Url too short (min 5)"
        );
    }

    #[test]
    fn test_allocation_invalid_is_transparent() {
        let err = AllocationError::from(ValidationError::ContentRequired);
        assert_eq!(err.to_string(), "data not provided");
        assert_eq!(err.reason(), "content_required");
    }

    #[test]
    fn test_store_error_hides_detail() {
        let err = AllocationError::from(StoreError::Unavailable("connection reset".into()));
        assert_eq!(err.to_string(), "storage unavailable");
        assert_eq!(err.reason(), "store_error");
    }

    #[test]
    fn test_terminal_collision_messages() {
        assert_eq!(AllocationError::CodeTaken.to_string(), "Url taken!");
        assert_eq!(
            AllocationError::RandomCodeExhausted.to_string(),
            "Free url not found!"
        );
    }
}
