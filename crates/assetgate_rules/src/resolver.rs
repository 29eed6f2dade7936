//! Match resolver: which candidate targets a source type may transform into.

use crate::error::TransformError;
use crate::ruleset::RuleSet;
use assetgate_core::Target;
use std::collections::BTreeSet;

/// Pure resolution over a validated rule set
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'r> {
    rules: &'r RuleSet,
}

impl<'r> Resolver<'r> {
    /// Create a resolver over a rule set
    #[must_use]
    pub fn new(rules: &'r RuleSet) -> Self {
        Self { rules }
    }

    /// Compute the authorized subset of `tos` for `from`
    ///
    /// Candidates are case-folded and de-duplicated. Every rule of `from`
    /// contributes: a wildcard adds all non-excluded candidates, a concrete
    /// target adds itself when it is a candidate, and `none` adds nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::NoMatch`] if no candidate is authorized
    pub fn resolve<S: AsRef<str>>(
        &self,
        from: &str,
        tos: &[S],
    ) -> Result<BTreeSet<String>, TransformError> {
        let from = fold(from);
        let candidates: BTreeSet<String> = tos.iter().map(|t| fold(t.as_ref())).collect();
        let mut authorized = BTreeSet::new();

        for rule in self.rules.rules_from(&from) {
            match &rule.to {
                Target::All => {
                    authorized.extend(
                        candidates
                            .iter()
                            .filter(|c| !rule.excludes(c.as_str()))
                            .cloned(),
                    );
                }
                Target::Asset(to) => {
                    if candidates.contains(to.as_str()) {
                        authorized.insert(to.to_string());
                    }
                }
                Target::None => {}
            }
        }

        tracing::trace!(
            %from,
            candidates = candidates.len(),
            authorized = authorized.len(),
            "resolved transformations"
        );

        if authorized.is_empty() {
            return Err(TransformError::NoMatch {
                from,
                tos: candidates.into_iter().collect(),
            });
        }
        Ok(authorized)
    }
}

pub(crate) fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}
