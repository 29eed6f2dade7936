//! Rule compiler: turns declarative entries into draft rules.

use crate::error::TransformError;
use crate::rule::{split_key, RuleSpec};
use std::collections::{BTreeMap, BTreeSet};

/// Highest accepted confidence
pub const MAX_CONFIDENCE: i64 = 100;

/// A compiled but not yet validated rule
///
/// Segments are folded to lower case; the vocabulary has not been consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRule {
    /// Key as declared
    pub key: String,
    /// Folded source segment
    pub from: String,
    /// Folded target segment
    pub to: String,
    /// Priority as declared
    pub priority: i64,
    /// Confidence after default substitution
    pub confidence: u8,
    /// Folded exclusions
    pub exclude: BTreeSet<String>,
}

/// Compiler for `"From->To"` rule declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleCompiler {
    /// Confidence applied to rules that leave it unset
    default_confidence: i64,
}

impl RuleCompiler {
    /// Create a compiler with the session default confidence
    #[must_use]
    pub fn new(default_confidence: i64) -> Self {
        Self { default_confidence }
    }

    /// Session default confidence
    #[must_use]
    pub fn default_confidence(&self) -> i64 {
        self.default_confidence
    }

    /// Compile every entry, in key order
    ///
    /// # Errors
    ///
    /// Returns the first malformed key or out-of-range confidence
    pub fn compile(
        &self,
        entries: &BTreeMap<String, RuleSpec>,
    ) -> Result<Vec<DraftRule>, TransformError> {
        entries
            .iter()
            .map(|(key, spec)| self.compile_entry(key, spec))
            .collect()
    }

    /// Compile one entry
    ///
    /// # Errors
    ///
    /// Returns error if the key is malformed or the confidence is out of range
    pub fn compile_entry(&self, key: &str, spec: &RuleSpec) -> Result<DraftRule, TransformError> {
        let (from, to) = split_key(key)?;

        let confidence = if spec.confidence == 0 {
            self.default_confidence
        } else {
            spec.confidence
        };
        let confidence = u8::try_from(confidence)
            .ok()
            .filter(|c| i64::from(*c) <= MAX_CONFIDENCE)
            .ok_or_else(|| TransformError::InvalidConfidence {
                key: key.to_string(),
                value: confidence,
            })?;

        let exclude = spec
            .exclude
            .iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        tracing::debug!(key, %from, %to, confidence, "compiled transformation");

        Ok(DraftRule {
            key: key.to_string(),
            from,
            to,
            priority: spec.priority,
            confidence,
            exclude,
        })
    }
}

impl Default for RuleCompiler {
    fn default() -> Self {
        Self::new(0)
    }
}
