//! Declarative rule payloads and validated transformation rules.

use crate::error::TransformError;
use assetgate_core::{AssetType, Target};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Delimiter between source and target in a rule key
pub const DELIMITER: &str = "->";

/// Declarative payload of a `"From->To"` entry
///
/// A zero confidence means "unset" and is replaced by the session default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSpec {
    /// Informational tie-break between rules
    #[serde(skip_serializing_if = "is_zero")]
    pub priority: i64,
    /// Confidence weight (0-100)
    #[serde(skip_serializing_if = "is_zero")]
    pub confidence: i64,
    /// Candidates a wildcard rule never authorizes
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl RuleSpec {
    /// Create an empty payload
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set priority
    #[must_use]
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    /// Set confidence
    #[must_use]
    pub fn with_confidence(mut self, confidence: i64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set exclusions
    #[must_use]
    pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

/// Split a rule key into folded `(from, to)` segments
///
/// # Errors
///
/// Returns [`TransformError::MalformedKey`] unless the key holds exactly one
/// delimiter with non-empty text on both sides
pub fn split_key(key: &str) -> Result<(String, String), TransformError> {
    let mut parts = key.split(DELIMITER);
    if let (Some(from), Some(to), None) = (parts.next(), parts.next(), parts.next()) {
        let from = from.trim().to_lowercase();
        let to = to.trim().to_lowercase();
        if !from.is_empty() && !to.is_empty() {
            return Ok((from, to));
        }
    }
    Err(TransformError::MalformedKey {
        key: key.to_string(),
    })
}

/// A validated transformation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformationRule {
    /// Key as declared
    pub key: String,
    /// Source asset type
    pub from: AssetType,
    /// Target asset type or sentinel
    pub to: Target,
    /// Informational tie-break, not enforced here
    pub priority: i64,
    /// Confidence weight after default substitution
    pub confidence: u8,
    /// Folded exclusions, meaningful only for wildcard rules
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub exclude: BTreeSet<String>,
}

impl TransformationRule {
    /// Check whether the rule's exclusions cover a folded candidate
    #[must_use]
    pub fn excludes(&self, candidate: &str) -> bool {
        self.exclude.contains(candidate)
    }

    /// Canonical `from->to` form of the rule's identity
    #[must_use]
    pub fn canonical_key(&self) -> String {
        format!("{}{}{}", self.from, DELIMITER, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_key() {
        assert_eq!(
            split_key("FQDN->IPAddress").unwrap(),
            ("fqdn".to_string(), "ipaddress".to_string())
        );
        assert_eq!(
            split_key(" fqdn -> ALL ").unwrap(),
            ("fqdn".to_string(), "all".to_string())
        );
    }

    #[test]
    fn test_split_key_missing_delimiter() {
        let err = split_key("FQDN-IPAddress").unwrap_err();
        assert_eq!(
            err,
            TransformError::MalformedKey {
                key: "FQDN-IPAddress".to_string()
            }
        );
    }

    #[test]
    fn test_split_key_rejects_empty_segments() {
        assert!(split_key("").is_err());
        assert!(split_key("->").is_err());
        assert!(split_key("fqdn->").is_err());
        assert!(split_key("->fqdn").is_err());
        assert!(split_key("fqdn->  ").is_err());
    }

    #[test]
    fn test_split_key_rejects_chains() {
        assert!(split_key("fqdn->ipaddress->whois").is_err());
    }

    #[test]
    fn test_rule_spec_deserialize_defaults() {
        let spec: RuleSpec = serde_json::from_str("{}").unwrap();
        assert_eq!(spec, RuleSpec::new());

        let spec: RuleSpec =
            serde_json::from_str(r#"{"priority": 2, "exclude": ["RIRORG", "FQDN"]}"#).unwrap();
        assert_eq!(spec.priority, 2);
        assert_eq!(spec.confidence, 0);
        assert_eq!(spec.exclude, vec!["RIRORG", "FQDN"]);
    }

    #[test]
    fn test_rule_spec_serialize_skips_unset() {
        let json = serde_json::to_string(&RuleSpec::new().with_priority(1)).unwrap();
        assert_eq!(json, r#"{"priority":1}"#);
    }
}
