//! Rename a file so its name carries its content hash.
//!
//! `dist/app.js` with contents hashing to `1a47e90b` becomes
//! `dist/app-1a47e90b.js`. A name that already carries a slug has it replaced,
//! so re-running on an already fingerprinted file only changes the slug.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::slug::{canonicalize, insert_fingerprint};
use crate::util::hash::{ContentHash, HashError, hash_file};

#[derive(Debug, Error)]
pub enum RenameError {
  #[error(transparent)]
  Hash(#[from] HashError),

  #[error("target path has no usable file name: {}", path.display())]
  InvalidTarget { path: PathBuf },

  #[error("failed to rename {} to {}: {source}", from.display(), to.display())]
  Rename {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Where a file ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameOutcome {
  pub from: PathBuf,
  pub to: PathBuf,
  pub hash: ContentHash,
}

/// Compute the fingerprinted path for `target` and `hash`.
///
/// Keeps the directory of `target`, strips any slug already in its file name
/// and inserts the new one before the extension.
pub fn fingerprinted_path(target: &Path, hash: ContentHash) -> Result<PathBuf, RenameError> {
  let base_name = target
    .file_name()
    .and_then(|name| name.to_str())
    .ok_or_else(|| RenameError::InvalidTarget {
      path: target.to_path_buf(),
    })?;
  let name = insert_fingerprint(&canonicalize(base_name), &hash.to_string());
  Ok(target.with_file_name(name))
}

/// Hash `input` and move it to its fingerprinted name.
///
/// The name is derived from `out` when given (the file moves there),
/// otherwise from `input` itself (renamed in place).
pub fn hash_rename(input: &Path, out: Option<&Path>) -> Result<RenameOutcome, RenameError> {
  let hash = hash_file(input)?;
  let target = fingerprinted_path(out.unwrap_or(input), hash)?;

  info!(from = %input.display(), to = %target.display(), "renaming");
  std::fs::rename(input, &target).map_err(|e| RenameError::Rename {
    from: input.to_path_buf(),
    to: target.clone(),
    source: e,
  })?;

  Ok(RenameOutcome {
    from: input.to_path_buf(),
    to: target,
    hash,
  })
}
