//! ASSETGATE Session Configuration
//!
//! Loads a declarative configuration document into a session object that
//! answers transformation-authorization queries for concurrent workers.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod options;

pub use config::{Config, ConfigDocument, ConfigError};
pub use options::Options;

pub use assetgate_core::{AssetType, CoreError, CoreResult, Target, Vocabulary};
pub use assetgate_rules::{Matches, RuleSpec, TransformError, TransformationRule};
