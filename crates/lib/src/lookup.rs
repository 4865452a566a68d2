//! Read-only lookups over a resolved manifest.
//!
//! Templates only ever see the manifest through [`AssetLookup`]. Keys are
//! passed as parts and concatenated without a separator, so a template can
//! build `index.css` from a page name and a suffix.

use tracing::debug;

use crate::manifest::Manifest;

/// Lookup surface the template renderer depends on.
pub trait AssetLookup {
  /// Fingerprinted file name for the joined key, or `""` if there is none.
  fn resolve_name(&self, key_parts: &[&str]) -> String;

  /// Whether the joined key names a known asset.
  fn exists(&self, key_parts: &[&str]) -> bool;
}

impl AssetLookup for Manifest {
  fn resolve_name(&self, key_parts: &[&str]) -> String {
    let key = key_parts.concat();
    let name = self
      .get(&key)
      .map(|entry| entry.base_name.clone())
      .unwrap_or_default();
    debug!(%key, %name, "resolve_name");
    name
  }

  fn exists(&self, key_parts: &[&str]) -> bool {
    let key = key_parts.concat();
    let found = self.contains(&key);
    debug!(%key, found, "exists");
    found
  }
}
