//! ASSETGATE Core Types
//!
//! Pure types with no I/O: the closed asset-type vocabulary, validated
//! asset types, rule targets, and the shared error type.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod asset;
pub mod error;
pub mod vocabulary;

// Re-exports
pub use asset::{AssetType, Target};
pub use error::{CoreError, CoreResult};
pub use vocabulary::Vocabulary;
