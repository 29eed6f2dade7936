//! Validated, immutable set of transformation rules.

use crate::rule::{split_key, TransformationRule};
use assetgate_core::AssetType;
use std::collections::BTreeMap;

/// Rules that passed validation, indexed by key and by source type
///
/// Only the validator builds a `RuleSet`; once built it is read-only and
/// shared between workers without locking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    /// Rules in key order
    rules: Vec<TransformationRule>,
    /// Declared key -> position in `rules`
    keys: BTreeMap<String, usize>,
    /// Source type -> positions in `rules`
    by_from: BTreeMap<AssetType, Vec<usize>>,
}

impl RuleSet {
    /// Create an empty rule set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, rule: TransformationRule) {
        let idx = self.rules.len();
        self.keys.insert(rule.key.clone(), idx);
        self.by_from.entry(rule.from.clone()).or_default().push(idx);
        self.rules.push(rule);
    }

    /// Look up a rule by its key
    ///
    /// The declared spelling is tried first, then the folded `from->to` form.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TransformationRule> {
        if let Some(&idx) = self.keys.get(key) {
            return self.rules.get(idx);
        }
        let (from, to) = split_key(key).ok()?;
        self.rules_from(&from).find(|r| r.to.as_str() == to)
    }

    /// Rules declared for a source type (case-insensitive)
    pub fn rules_from<'a>(
        &'a self,
        from: &str,
    ) -> impl Iterator<Item = &'a TransformationRule> + use<'a> {
        let from = from.trim().to_lowercase();
        self.by_from
            .get(from.as_str())
            .into_iter()
            .flatten()
            .filter_map(move |&idx| self.rules.get(idx))
    }

    /// Rules for a source type ordered by ascending priority, then target
    #[must_use]
    pub fn by_priority(&self, from: &str) -> Vec<&TransformationRule> {
        let mut rules: Vec<_> = self.rules_from(from).collect();
        rules.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.to.cmp(&b.to)));
        rules
    }

    /// Whether the source type is declared with a `none` rule
    #[must_use]
    pub fn is_blocked(&self, from: &str) -> bool {
        self.rules_from(from).any(|r| r.to.is_none())
    }

    /// Source types that have at least one rule
    pub fn from_types(&self) -> impl Iterator<Item = &AssetType> {
        self.by_from.keys()
    }

    /// Iterate all rules in key order
    pub fn iter(&self) -> impl Iterator<Item = &TransformationRule> {
        self.rules.iter()
    }

    /// Number of rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the set holds no rules
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
