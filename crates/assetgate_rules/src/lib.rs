//! ASSETGATE Transformation Rules
//!
//! Declarative `"From->To"` rules are compiled, validated against the asset
//! vocabulary, and queried concurrently through a per-source-type cache.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod compiler;
pub mod error;
pub mod resolver;
pub mod rule;
pub mod ruleset;
pub mod transformer;
pub mod validate;

pub use cache::{MatchCache, Matches};
pub use compiler::{DraftRule, RuleCompiler};
pub use error::{ConflictMode, TransformError};
pub use resolver::Resolver;
pub use rule::{split_key, RuleSpec, TransformationRule};
pub use ruleset::RuleSet;
pub use transformer::Transformer;
pub use validate::{ConsistencyState, Validator};
