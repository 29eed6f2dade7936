//! Core error types for ASSETGATE.

use thiserror::Error;

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Name is not part of the asset vocabulary
    #[error("Invalid asset type {name:?}: {reason}")]
    InvalidAssetType {
        /// Offending name as supplied
        name: String,
        /// Why the name was rejected
        reason: String,
    },

    /// Parse error
    #[error("Parse error: {message}")]
    ParseError {
        /// Parser message
        message: String,
    },

    /// Validation error
    #[error("Validation failed for {field}: {reason}")]
    Validation {
        /// Field or key that failed
        field: String,
        /// Failure description
        reason: String,
    },

    /// Transformation rule error, tagged with its kind
    #[error("Transformation error ({kind}): {message}")]
    Transform {
        /// Stable kind name, e.g. `conflicting_rule`
        kind: String,
        /// Full error message
        message: String,
    },

    /// Not found
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of the missing item
        kind: String,
        /// Identifier that was looked up
        id: String,
    },
}

impl CoreError {
    /// Shorthand for a validation failure
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            message: err.to_string(),
        }
    }
}
