//! Content hashing for fingerprint slugs.
//!
//! This module provides:
//! - `ContentHash`: a 32-bit FNV-1a digest, displayed as 8 lowercase hex digits
//! - `Fnv1a32`: the incremental hasher behind it
//! - `hash_file()`: streaming single file hashing
//! - `hash_bytes()`: arbitrary byte hashing
//!
//! FNV-1a is not collision resistant. It only needs to be deterministic and
//! change when file contents change, which is all a cache-busting slug needs.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::consts::{FINGERPRINT_LEN, HASH_READ_BUFFER};

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// A 32-bit content hash.
///
/// # Format
///
/// Displays as exactly 8 lowercase hex digits, zero padded, e.g. `"1a47e90b"`.
/// This is the form embedded into fingerprinted file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash(pub u32);

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:0width$x}", self.0, width = FINGERPRINT_LEN)
  }
}

impl Serialize for ContentHash {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

/// Incremental 32-bit FNV-1a hasher.
#[derive(Debug, Clone)]
pub struct Fnv1a32 {
  state: u32,
}

impl Default for Fnv1a32 {
  fn default() -> Self {
    Self { state: FNV_OFFSET_BASIS }
  }
}

impl Fnv1a32 {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn update(&mut self, data: &[u8]) {
    for byte in data {
      self.state ^= u32::from(*byte);
      self.state = self.state.wrapping_mul(FNV_PRIME);
    }
  }

  pub fn finish(&self) -> ContentHash {
    ContentHash(self.state)
  }
}

/// Error while hashing a file.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
  #[error("failed to read file {}: {source}", path.display())]
  ReadFile {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Hash a file's contents.
pub fn hash_file(path: &Path) -> Result<ContentHash, HashError> {
  let read_err = |source| HashError::ReadFile {
    path: path.to_path_buf(),
    source,
  };

  let mut file = fs::File::open(path).map_err(read_err)?;
  let mut hasher = Fnv1a32::new();
  let mut buffer = [0u8; HASH_READ_BUFFER];

  loop {
    let bytes_read = file.read(&mut buffer).map_err(read_err)?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(hasher.finish())
}

/// Hash arbitrary bytes.
pub fn hash_bytes(data: &[u8]) -> ContentHash {
  let mut hasher = Fnv1a32::new();
  hasher.update(data);
  hasher.finish()
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn known_vectors() {
    assert_eq!(hash_bytes(b"").to_string(), "811c9dc5");
    assert_eq!(hash_bytes(b"a").to_string(), "e40c292c");
    assert_eq!(hash_bytes(b"abc").to_string(), "1a47e90b");
  }

  #[test]
  fn display_is_zero_padded() {
    assert_eq!(ContentHash(0xff).to_string(), "000000ff");
  }

  #[test]
  fn incremental_matches_one_shot() {
    let mut hasher = Fnv1a32::new();
    hasher.update(b"hello ");
    hasher.update(b"world");
    assert_eq!(hasher.finish(), hash_bytes(b"hello world"));
  }

  #[test]
  fn order_sensitive() {
    assert_ne!(hash_bytes(b"ab"), hash_bytes(b"ba"));
  }

  #[test]
  fn hash_file_matches_bytes() {
    let temp = tempdir().unwrap();
    let file_path = temp.path().join("test.txt");
    fs::write(&file_path, "hello world").unwrap();

    let hash = hash_file(&file_path).unwrap();
    assert_eq!(hash, hash_bytes(b"hello world"));
    assert_eq!(hash.to_string(), "d58b3fa7");
  }

  #[test]
  fn hash_file_spanning_buffers() {
    let temp = tempdir().unwrap();
    let file_path = temp.path().join("big.bin");
    let content: Vec<u8> = (0..HASH_READ_BUFFER * 3 + 17).map(|i| (i % 251) as u8).collect();
    fs::write(&file_path, &content).unwrap();

    assert_eq!(hash_file(&file_path).unwrap(), hash_bytes(&content));
  }

  #[test]
  fn hash_missing_file_fails() {
    let temp = tempdir().unwrap();
    let missing = temp.path().join("missing.txt");

    let err = hash_file(&missing).unwrap_err();
    assert!(matches!(err, HashError::ReadFile { ref path, .. } if path == &missing));
  }

  #[test]
  fn serializes_as_hex_string() {
    let json = serde_json::to_string(&ContentHash(0x1a47e90b)).unwrap();
    assert_eq!(json, "\"1a47e90b\"");
  }
}
