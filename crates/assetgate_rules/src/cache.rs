//! Per-source-type cache of authorized transformations.

use crate::error::TransformError;
use crate::resolver::{fold, Resolver};
use crate::ruleset::RuleSet;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Authorized targets for one source type
///
/// Grows monotonically: every successful resolution for the source type
/// unions its result into the same entry.
#[derive(Debug)]
pub struct Matches {
    from: String,
    to: RwLock<BTreeSet<String>>,
}

impl Matches {
    fn with(from: String, authorized: BTreeSet<String>) -> Self {
        Self {
            from,
            to: RwLock::new(authorized),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeSet<String>> {
        self.to.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeSet<String>> {
        self.to.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn extend(&self, authorized: BTreeSet<String>) {
        self.write().extend(authorized);
    }

    /// Source type of this entry
    #[must_use]
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Check whether a target is authorized (case-insensitive)
    #[must_use]
    pub fn is_match(&self, to: &str) -> bool {
        self.read().contains(&fold(to))
    }

    /// Number of authorized targets
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if nothing is authorized yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Sorted copy of the authorized targets
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.read().iter().cloned().collect()
    }
}

/// Thread-safe memo of resolved matches, keyed by source type
#[derive(Debug, Default)]
pub struct MatchCache {
    entries: RwLock<FxHashMap<String, Arc<Matches>>>,
}

impl MatchCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve candidates for a source type and merge them into its entry
    ///
    /// The resolution itself runs without holding any lock. A new entry is
    /// published already populated, so readers never see an empty one. A
    /// failed resolution leaves the cache untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::NoMatch`] if no candidate is authorized
    pub fn resolve<S: AsRef<str>>(
        &self,
        rules: &RuleSet,
        from: &str,
        tos: &[S],
    ) -> Result<Arc<Matches>, TransformError> {
        let authorized = Resolver::new(rules).resolve(from, tos)?;
        let from = fold(from);

        let existing = self.read().get(&from).cloned();
        let entry = match existing {
            Some(entry) => entry,
            None => {
                let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
                let entry = match entries.entry(from) {
                    Entry::Occupied(occupied) => Arc::clone(occupied.get()),
                    Entry::Vacant(vacant) => {
                        let entry = Arc::new(Matches::with(vacant.key().clone(), authorized));
                        vacant.insert(Arc::clone(&entry));
                        return Ok(entry);
                    }
                };
                entry
            }
        };
        entry.extend(authorized);
        Ok(entry)
    }

    fn read(&self) -> RwLockReadGuard<'_, FxHashMap<String, Arc<Matches>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handle on a resolved entry
    #[must_use]
    pub fn get(&self, from: &str) -> Option<Arc<Matches>> {
        self.read().get(&fold(from)).cloned()
    }

    /// Point query; `false` if the source type was never resolved
    #[must_use]
    pub fn is_match(&self, from: &str, to: &str) -> bool {
        self.get(from).is_some_and(|m| m.is_match(to))
    }

    /// Cardinality of a source type's entry; 0 if never resolved
    #[must_use]
    pub fn size(&self, from: &str) -> usize {
        self.get(from).map_or(0, |m| m.len())
    }

    /// Source types with an entry, sorted
    #[must_use]
    pub fn resolved(&self) -> Vec<String> {
        let mut froms: Vec<String> = self.read().keys().cloned().collect();
        froms.sort();
        froms
    }
}
