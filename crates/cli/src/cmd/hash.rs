//! Implementation of the `pagekit hash` command.
//!
//! Prints the 32-bit FNV-1a hash of a file as 8 lowercase hex digits.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use pagekit_lib::util::hash::{ContentHash, hash_file};

use crate::output::{OutputFormat, print_json};

#[derive(Serialize)]
struct HashOutput {
  path: PathBuf,
  hash: ContentHash,
}

pub fn cmd_hash(input: &Path, format: OutputFormat) -> Result<()> {
  let hash = hash_file(input).with_context(|| format!("Failed to hash {}", input.display()))?;

  if format.is_json() {
    print_json(&HashOutput {
      path: input.to_path_buf(),
      hash,
    })?;
  } else {
    println!("{hash}");
  }

  Ok(())
}
