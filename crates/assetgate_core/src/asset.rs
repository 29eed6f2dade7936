//! Asset types and transformation targets.
//!
//! An [`AssetType`] can only be obtained from a [`Vocabulary`](crate::Vocabulary),
//! so holding one proves the name was checked at the ingestion boundary.

use serde::{Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;

/// Reserved target text meaning "no transformations from this type"
pub const NONE: &str = "none";

/// Reserved target text meaning "every candidate except the excluded ones"
pub const ALL: &str = "all";

/// Check whether a (case-folded) name is one of the reserved sentinels
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    name == NONE || name == ALL
}

/// A validated, lower-case asset type name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetType(String);

impl AssetType {
    /// Wrap a name that the vocabulary has already folded and checked
    pub(crate) fn from_checked(name: String) -> Self {
        Self(name)
    }

    /// Plain text of the asset type
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against raw text
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name.trim())
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AssetType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AssetType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Serialize for AssetType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Right-hand side of a transformation rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    /// A concrete asset type
    Asset(AssetType),
    /// Explicit negation: nothing is authorized from the source type
    None,
    /// Wildcard: every candidate not listed in the rule's exclusions
    All,
}

impl Target {
    /// Plain text of the target as it appears in a rule key
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Asset(asset) => asset.as_str(),
            Self::None => NONE,
            Self::All => ALL,
        }
    }

    /// Whether this is the negation target
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Whether this is the wildcard target
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
