//! Errors raised while loading or querying transformation rules.

use assetgate_core::CoreError;
use std::fmt;

/// Which side of a none-vs-other conflict was declared second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictMode {
    /// A `none` rule arrived after a regular transformation
    NoneAfterOther,
    /// A regular transformation arrived after a `none` rule
    OtherAfterNone,
}

impl fmt::Display for ConflictMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoneAfterOther => write!(f, "'none' specified after a valid transformation"),
            Self::OtherAfterNone => write!(f, "valid transformation specified after 'none'"),
        }
    }
}

/// Transformation rule error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// Key is not of the form `From->To`
    #[error("Invalid key delimiter: {key:?} (expected \"From->To\")")]
    MalformedKey {
        /// Raw key
        key: String,
    },

    /// Source type is not in the vocabulary
    #[error("Invalid 'From' type in {key:?}: {from} is not a known asset type")]
    UnknownSourceType {
        /// Raw key
        key: String,
        /// Folded source type
        from: String,
    },

    /// Target type is neither in the vocabulary nor a sentinel
    #[error("Invalid 'To' type in {key:?}: {to} is not a known asset type")]
    UnknownTargetType {
        /// Raw key
        key: String,
        /// Folded target type
        to: String,
    },

    /// `none` and another rule were declared for the same source type
    #[error("Invalid config: {mode} for 'From' type {from} in {key:?}; 'none' should be the only transformation")]
    ConflictingRule {
        /// Source type
        from: String,
        /// Key that triggered the conflict
        key: String,
        /// Order in which the conflict surfaced
        mode: ConflictMode,
    },

    /// Two keys fold to the same `(From, To)` pair
    #[error("Duplicate transformation {from}->{to}: {key:?} repeats {existing:?}")]
    DuplicateRule {
        /// Source type
        from: String,
        /// Target type
        to: String,
        /// Key seen second
        key: String,
        /// Key seen first
        existing: String,
    },

    /// Confidence outside 0..=100
    #[error("Invalid confidence {value} in {key:?}: expected 0-100")]
    InvalidConfidence {
        /// Raw key
        key: String,
        /// Effective confidence
        value: i64,
    },

    /// A query authorized no candidate
    #[error("Zero transformation matches in the session config for {from} -> [{}]", .tos.join(", "))]
    NoMatch {
        /// Source type queried
        from: String,
        /// Candidates queried, folded and sorted
        tos: Vec<String>,
    },
}

impl TransformError {
    /// Whether this error aborts configuration load
    ///
    /// Only [`TransformError::NoMatch`] is raised at query time; workers treat
    /// it as "do not expand this branch".
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        !matches!(self, Self::NoMatch { .. })
    }

    /// Stable name of the error kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedKey { .. } => "malformed_key",
            Self::UnknownSourceType { .. } => "unknown_source_type",
            Self::UnknownTargetType { .. } => "unknown_target_type",
            Self::ConflictingRule { .. } => "conflicting_rule",
            Self::DuplicateRule { .. } => "duplicate_rule",
            Self::InvalidConfidence { .. } => "invalid_confidence",
            Self::NoMatch { .. } => "no_match",
        }
    }
}

impl From<TransformError> for CoreError {
    fn from(err: TransformError) -> Self {
        CoreError::Transform {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}
