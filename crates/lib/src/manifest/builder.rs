//! Manifest construction with newest-wins duplicate resolution.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use tracing::{debug, warn};

use super::types::{Manifest, ManifestEntry, ManifestError};
use crate::slug::canonicalize;

/// What happened to a candidate fed into a [`ManifestBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
  /// First candidate seen for its logical key
  Inserted,
  /// Candidate displaced an older (or equally old) one
  Replaced { previous: String },
  /// Candidate is older than the current entry and was dropped
  Discarded { kept: String },
}

/// Accumulates candidates, keeping one entry per logical key.
///
/// A candidate replaces the current entry for its key unless the current
/// entry is strictly newer. Equal timestamps therefore resolve to whichever
/// candidate was fed last, making argument order authoritative.
#[derive(Debug, Default)]
pub struct ManifestBuilder {
  entries: BTreeMap<String, ManifestEntry>,
}

impl ManifestBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Feed one candidate with an already known modification time.
  pub fn feed(&mut self, path: &Path, modified_at: SystemTime) -> Result<FeedOutcome, ManifestError> {
    // Names that are not UTF-8 still take part, with invalid bytes replaced.
    let base_name = path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .ok_or_else(|| ManifestError::InvalidPath {
        path: path.to_path_buf(),
      })?;
    let logical_key = canonicalize(&base_name);

    let candidate = ManifestEntry {
      logical_key: logical_key.clone(),
      base_name,
      path: path.to_path_buf(),
      modified_at,
    };

    let outcome = match self.entries.entry(logical_key) {
      Entry::Vacant(slot) => {
        slot.insert(candidate);
        FeedOutcome::Inserted
      }
      Entry::Occupied(mut slot) => {
        if slot.get().modified_at > modified_at {
          FeedOutcome::Discarded {
            kept: slot.get().base_name.clone(),
          }
        } else {
          let previous = slot.insert(candidate);
          FeedOutcome::Replaced {
            previous: previous.base_name,
          }
        }
      }
    };

    debug!(path = %path.display(), ?outcome, "fed manifest candidate");
    Ok(outcome)
  }

  /// Stat `path` and feed it.
  ///
  /// A path that does not exist is skipped with a warning and yields
  /// `Ok(None)`. Any other stat failure is fatal.
  pub fn feed_path(&mut self, path: &Path) -> Result<Option<FeedOutcome>, ManifestError> {
    let metadata = match std::fs::metadata(path) {
      Ok(metadata) => metadata,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        warn!(path = %path.display(), "skipping missing file");
        return Ok(None);
      }
      Err(e) => {
        return Err(ManifestError::FileAccess {
          path: path.to_path_buf(),
          source: e,
        });
      }
    };

    let modified_at = metadata.modified().map_err(|e| ManifestError::FileAccess {
      path: path.to_path_buf(),
      source: e,
    })?;

    self.feed(path, modified_at).map(Some)
  }

  pub fn finish(self) -> Manifest {
    Manifest { entries: self.entries }
  }
}

/// Build a manifest from candidate paths, in the given order.
///
/// For each path:
/// 1. Missing files are skipped with a warning
/// 2. Any other stat failure aborts with [`ManifestError::FileAccess`]
/// 3. The file name is canonicalized into its logical key
/// 4. The newest candidate per key wins; ties go to the later path
pub fn build<I, P>(paths: I) -> Result<Manifest, ManifestError>
where
  I: IntoIterator<Item = P>,
  P: AsRef<Path>,
{
  let mut builder = ManifestBuilder::new();
  for path in paths {
    builder.feed_path(path.as_ref())?;
  }

  let manifest = builder.finish();
  debug!(entries = manifest.len(), "manifest built");
  for entry in manifest.entries() {
    debug!(
      key = %entry.logical_key,
      name = %entry.base_name,
      path = %entry.path.display(),
      "manifest entry"
    );
  }
  Ok(manifest)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use std::time::Duration;
  use tempfile::tempdir;
  use tracing_test::traced_test;

  fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
  }

  fn set_mtime(path: &Path, time: SystemTime) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(time).unwrap();
  }

  #[test]
  fn newest_wins_in_order() {
    let mut builder = ManifestBuilder::new();
    builder.feed(Path::new("a-11111111.css"), at(1)).unwrap();
    builder.feed(Path::new("a-22222222.css"), at(2)).unwrap();

    let manifest = builder.finish();
    assert_eq!(manifest.len(), 1);
    assert_eq!(manifest.get("a.css").unwrap().base_name, "a-22222222.css");
  }

  #[test]
  fn newest_wins_reversed() {
    let mut builder = ManifestBuilder::new();
    builder.feed(Path::new("a-22222222.css"), at(2)).unwrap();
    let outcome = builder.feed(Path::new("a-11111111.css"), at(1)).unwrap();

    assert_eq!(
      outcome,
      FeedOutcome::Discarded {
        kept: "a-22222222.css".to_string()
      }
    );
    let manifest = builder.finish();
    assert_eq!(manifest.get("a.css").unwrap().base_name, "a-22222222.css");
  }

  #[test]
  fn equal_timestamps_resolve_to_last_fed() {
    let mut builder = ManifestBuilder::new();
    builder.feed(Path::new("a-11111111.css"), at(5)).unwrap();
    let outcome = builder.feed(Path::new("a-22222222.css"), at(5)).unwrap();

    assert_eq!(
      outcome,
      FeedOutcome::Replaced {
        previous: "a-11111111.css".to_string()
      }
    );
    assert_eq!(builder.finish().get("a.css").unwrap().base_name, "a-22222222.css");
  }

  #[test]
  fn epoch_timestamps_still_resolve() {
    let mut builder = ManifestBuilder::new();
    builder.feed(Path::new("a-11111111.css"), SystemTime::UNIX_EPOCH).unwrap();
    builder.feed(Path::new("a-22222222.css"), SystemTime::UNIX_EPOCH).unwrap();

    assert_eq!(builder.finish().get("a.css").unwrap().base_name, "a-22222222.css");
  }

  #[test]
  fn distinct_keys_are_kept_separately() {
    let mut builder = ManifestBuilder::new();
    builder.feed(Path::new("dist/app-11111111.css"), at(1)).unwrap();
    builder.feed(Path::new("dist/app-22222222.js"), at(1)).unwrap();
    builder.feed(Path::new("dist/logo.png"), at(1)).unwrap();

    let manifest = builder.finish();
    let keys: Vec<_> = manifest.entries().map(|e| e.logical_key.as_str()).collect();
    assert_eq!(keys, vec!["app.css", "app.js", "logo.png"]);
  }

  #[test]
  fn entry_keeps_path_as_given() {
    let mut builder = ManifestBuilder::new();
    builder.feed(Path::new("./public/app-11111111.css"), at(1)).unwrap();

    let manifest = builder.finish();
    let entry = manifest.get("app.css").unwrap();
    assert_eq!(entry.base_name, "app-11111111.css");
    assert_eq!(entry.path, Path::new("./public/app-11111111.css"));
  }

  #[test]
  fn path_without_file_name_is_rejected() {
    let mut builder = ManifestBuilder::new();
    let err = builder.feed(Path::new(".."), at(1)).unwrap_err();
    assert!(matches!(err, ManifestError::InvalidPath { .. }));
  }

  #[cfg(target_os = "linux")]
  #[test]
  fn non_utf8_file_name_is_kept() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp = tempdir().unwrap();
    let path = temp.path().join(OsStr::from_bytes(b"caf\xe9-deadbeef.css"));
    fs::write(&path, "x").unwrap();
    let other = temp.path().join("style-cafe1234.css");
    fs::write(&other, "x").unwrap();

    let manifest = build([&path, &other]).unwrap();

    assert_eq!(manifest.len(), 2);
    let entry = manifest.get("caf\u{FFFD}.css").unwrap();
    assert_eq!(entry.base_name, "caf\u{FFFD}-deadbeef.css");
    assert_eq!(entry.path, path);
  }

  #[test]
  fn build_uses_file_mtimes() {
    let temp = tempdir().unwrap();
    let old = temp.path().join("a-11111111.css");
    let new = temp.path().join("a-22222222.css");
    fs::write(&old, "old").unwrap();
    fs::write(&new, "new").unwrap();
    set_mtime(&old, at(1_000));
    set_mtime(&new, at(2_000));

    let manifest = build([&new, &old]).unwrap();
    assert_eq!(manifest.get("a.css").unwrap().base_name, "a-22222222.css");

    let manifest = build([&old, &new]).unwrap();
    assert_eq!(manifest.get("a.css").unwrap().base_name, "a-22222222.css");
  }

  #[test]
  #[traced_test]
  fn missing_files_are_skipped() {
    let temp = tempdir().unwrap();
    let present = temp.path().join("style-deadbeef.css");
    fs::write(&present, "body {}").unwrap();
    let missing = temp.path().join("gone-12345678.js");

    let manifest = build([&missing, &present]).unwrap();

    assert_eq!(manifest.len(), 1);
    assert_eq!(manifest.get("style.css").unwrap().base_name, "style-deadbeef.css");
    assert!(!manifest.contains("gone.js"));
    assert!(logs_contain("skipping missing file"));
  }

  #[cfg(unix)]
  #[test]
  fn stat_failure_other_than_missing_is_fatal() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("plain.txt");
    fs::write(&file, "x").unwrap();
    // A path through a regular file fails with ENOTDIR, not ENOENT.
    let bad = file.join("child-11111111.css");

    let err = build([&bad]).unwrap_err();
    assert!(matches!(err, ManifestError::FileAccess { ref path, .. } if path == &bad));
  }

  #[test]
  fn empty_input_builds_empty_manifest() {
    let manifest = build(Vec::<&Path>::new()).unwrap();
    assert!(manifest.is_empty());
  }
}
