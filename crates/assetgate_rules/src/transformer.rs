//! Transformer: validated rules plus their match cache.

use crate::cache::{MatchCache, Matches};
use crate::compiler::RuleCompiler;
use crate::error::TransformError;
use crate::rule::RuleSpec;
use crate::ruleset::RuleSet;
use crate::validate::Validator;
use assetgate_core::Vocabulary;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Authorization engine for one session
///
/// Rules are fixed at load; only the cache mutates afterwards.
#[derive(Debug)]
pub struct Transformer {
    rules: RuleSet,
    cache: MatchCache,
}

impl Transformer {
    /// Compile and validate declarative entries
    ///
    /// # Errors
    ///
    /// Returns the first load-time error; no transformer is produced
    pub fn load(
        entries: &BTreeMap<String, RuleSpec>,
        vocabulary: &Vocabulary,
        default_confidence: i64,
    ) -> Result<Self, TransformError> {
        let drafts = RuleCompiler::new(default_confidence).compile(entries)?;
        let rules = Validator::new(vocabulary).validate(drafts)?;

        tracing::info!(
            rules = rules.len(),
            from_types = rules.from_types().count(),
            default_confidence,
            "loaded transformation rules"
        );

        Ok(Self::with_cache(rules, MatchCache::new()))
    }

    /// Assemble from an already validated rule set and a cache
    #[must_use]
    pub fn with_cache(rules: RuleSet, cache: MatchCache) -> Self {
        Self { rules, cache }
    }

    /// Authorize a batch of candidates for a source type
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::NoMatch`] if none is authorized
    pub fn check<S: AsRef<str>>(
        &self,
        from: &str,
        tos: &[S],
    ) -> Result<Arc<Matches>, TransformError> {
        self.cache.resolve(&self.rules, from, tos)
    }

    /// Point query against earlier resolutions
    #[must_use]
    pub fn check_result(&self, from: &str, to: &str) -> bool {
        self.cache.is_match(from, to)
    }

    /// Handle on a resolved source type
    #[must_use]
    pub fn matches(&self, from: &str) -> Option<Arc<Matches>> {
        self.cache.get(from)
    }

    /// Number of authorized targets resolved so far for a source type
    #[must_use]
    pub fn len(&self, from: &str) -> usize {
        self.cache.size(from)
    }

    /// Validated rules
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Match cache
    #[must_use]
    pub fn cache(&self) -> &MatchCache {
        &self.cache
    }
}
