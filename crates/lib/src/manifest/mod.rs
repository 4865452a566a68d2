//! Fingerprint manifest: logical asset name -> newest fingerprinted file.
//!
//! The manifest is built once from the files named on the command line and
//! is read-only afterwards. See [`build`] for the resolution rules.

mod builder;
mod types;

pub use builder::{FeedOutcome, ManifestBuilder, build};
pub use types::*;
