//! Implementation of the `pagekit hash-rename` command.

use std::path::Path;

use anyhow::{Context, Result};

use pagekit_lib::rename::hash_rename;

use crate::output::{OutputFormat, print_json};

/// Rename `input` to its fingerprinted name and print where it went.
///
/// Text output is the new path alone so shell scripts can capture it.
pub fn cmd_hash_rename(input: &Path, out: Option<&Path>, format: OutputFormat) -> Result<()> {
  let outcome = hash_rename(input, out).with_context(|| format!("Failed to hash-rename {}", input.display()))?;

  if format.is_json() {
    print_json(&outcome)?;
  } else {
    println!("{}", outcome.to.display());
  }

  Ok(())
}
