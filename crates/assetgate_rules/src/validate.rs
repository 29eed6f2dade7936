//! Consistency validator for compiled rules.
//!
//! Checks every draft against the vocabulary and enforces that a source type
//! is declared either with a single `none` rule or with regular rules, never
//! both.

use crate::compiler::DraftRule;
use crate::error::{ConflictMode, TransformError};
use crate::rule::TransformationRule;
use crate::ruleset::RuleSet;
use assetgate_core::{AssetType, Target, Vocabulary};
use std::collections::{BTreeMap, BTreeSet};

/// Exclusivity bookkeeping for one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyState {
    /// Source types that registered a `none` rule
    from_with_none: BTreeSet<AssetType>,
    /// Source types that registered any other rule
    from_with_other: BTreeSet<AssetType>,
}

impl ConsistencyState {
    /// Create an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule, failing if it contradicts an earlier one
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::ConflictingRule`] when `none` and another
    /// rule meet on the same source type
    pub fn register(&mut self, rule: &TransformationRule) -> Result<(), TransformError> {
        let conflict = |mode: ConflictMode| TransformError::ConflictingRule {
            from: rule.from.to_string(),
            key: rule.key.clone(),
            mode,
        };

        if rule.to.is_none() {
            if self.from_with_other.contains(&rule.from) {
                return Err(conflict(ConflictMode::NoneAfterOther));
            }
            self.from_with_none.insert(rule.from.clone());
        } else {
            if self.from_with_none.contains(&rule.from) {
                return Err(conflict(ConflictMode::OtherAfterNone));
            }
            self.from_with_other.insert(rule.from.clone());
        }
        Ok(())
    }

    /// Whether a `none` rule was registered for the source type
    #[must_use]
    pub fn has_none(&self, from: &str) -> bool {
        self.from_with_none.contains(from)
    }

    /// Whether a regular rule was registered for the source type
    #[must_use]
    pub fn has_other(&self, from: &str) -> bool {
        self.from_with_other.contains(from)
    }
}

/// Validator that turns drafts into a [`RuleSet`]
pub struct Validator<'v> {
    vocabulary: &'v Vocabulary,
}

impl<'v> Validator<'v> {
    /// Create a validator over a vocabulary
    #[must_use]
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Validate all drafts in a single pass
    ///
    /// Drafts are visited in key order so the same declaration always
    /// reports the same diagnostic.
    ///
    /// # Errors
    ///
    /// Returns the first vocabulary, duplicate, or exclusivity violation
    pub fn validate(&self, drafts: Vec<DraftRule>) -> Result<RuleSet, TransformError> {
        let mut drafts = drafts;
        drafts.sort_by(|a, b| a.key.cmp(&b.key));

        let mut state = ConsistencyState::new();
        let mut seen: BTreeMap<(String, String), String> = BTreeMap::new();
        let mut rules = RuleSet::new();

        for draft in drafts {
            let pair = (draft.from.clone(), draft.to.clone());
            let rule = self.check_rule(draft, &mut state)?;
            if let Some(existing) = seen.get(&pair) {
                return Err(TransformError::DuplicateRule {
                    from: pair.0,
                    to: pair.1,
                    key: rule.key,
                    existing: existing.clone(),
                });
            }
            seen.insert(pair, rule.key.clone());
            rules.insert(rule);
        }

        Ok(rules)
    }

    /// Validate one draft against the vocabulary and the running state
    ///
    /// # Errors
    ///
    /// Returns error if a segment is unknown or the rule conflicts with one
    /// already registered in `state`
    pub fn check_rule(
        &self,
        draft: DraftRule,
        state: &mut ConsistencyState,
    ) -> Result<TransformationRule, TransformError> {
        let from = self
            .vocabulary
            .get(&draft.from)
            .ok_or_else(|| TransformError::UnknownSourceType {
                key: draft.key.clone(),
                from: draft.from.clone(),
            })?;
        let to = self
            .vocabulary
            .target(&draft.to)
            .ok_or_else(|| TransformError::UnknownTargetType {
                key: draft.key.clone(),
                to: draft.to.clone(),
            })?;

        self.check_exclusions(&draft, &to);

        let rule = TransformationRule {
            key: draft.key,
            from,
            to,
            priority: draft.priority,
            confidence: draft.confidence,
            exclude: draft.exclude,
        };
        state.register(&rule)?;
        Ok(rule)
    }

    fn check_exclusions(&self, draft: &DraftRule, to: &Target) {
        if draft.exclude.is_empty() {
            return;
        }
        if !to.is_all() {
            tracing::warn!(key = %draft.key, "exclude list ignored on a non-wildcard transformation");
            return;
        }
        for name in draft.exclude.iter().filter(|e| !self.vocabulary.contains(e)) {
            tracing::warn!(key = %draft.key, exclude = %name, "excluded type is not a known asset type");
        }
    }
}
