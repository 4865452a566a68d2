//! Manifest types.
//!
//! # Structure
//!
//! A [`Manifest`] maps a logical key (a file name with its fingerprint slug
//! stripped, e.g. `app.css`) to the single [`ManifestEntry`] chosen for it
//! (e.g. `app-1a2b3c4d.css`).
//!
//! # Ordering
//!
//! Uses [`BTreeMap`] so diagnostic dumps list entries in key order regardless
//! of the order files were given in.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::SystemTime;

use thiserror::Error;

/// The file chosen to represent a logical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
  /// Fingerprint-stripped name, e.g. `app.css`
  pub logical_key: String,
  /// Final path segment as found on disk, e.g. `app-1a2b3c4d.css`
  pub base_name: String,
  /// Path exactly as it was given, including any directory prefix
  pub path: PathBuf,
  /// Modification time used to pick the newest candidate
  pub modified_at: SystemTime,
}

/// Resolved mapping from logical key to its newest fingerprinted file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
  pub(crate) entries: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
  /// Look up the entry for a logical key.
  pub fn get(&self, logical_key: &str) -> Option<&ManifestEntry> {
    self.entries.get(logical_key)
  }

  pub fn contains(&self, logical_key: &str) -> bool {
    self.entries.contains_key(logical_key)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Iterate entries in logical-key order.
  pub fn entries(&self) -> impl Iterator<Item = &ManifestEntry> {
    self.entries.values()
  }
}

/// Errors that abort manifest construction.
#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("failed to access input file {}: {source}", path.display())]
  FileAccess {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("input path has no usable file name: {}", path.display())]
  InvalidPath { path: PathBuf },
}
