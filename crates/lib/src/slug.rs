//! Fingerprint slug handling for asset filenames.
//!
//! Build pipelines name their outputs `<stem>-<slug>.<ext>`, where the slug is
//! an 8-digit lowercase hex content hash. Stripping the slug recovers the
//! logical name that templates refer to:
//!
//! ```
//! use pagekit_lib::slug::{canonicalize, insert_fingerprint};
//!
//! assert_eq!(canonicalize("app-1a2b3c4d.css"), "app.css");
//! assert_eq!(canonicalize("vendor_deadbeef.min.js"), "vendor.min.js");
//! assert_eq!(insert_fingerprint("app.css", "1a2b3c4d"), "app-1a2b3c4d.css");
//! ```
//!
//! Uppercase hex and slugs shorter than 8 digits are not fingerprints and are
//! left alone.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::consts::FINGERPRINT_SEPARATOR;

/// A `-` or `_`, eight lowercase hex digits, then the extension dot.
static SLUG_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[_-][0-9a-f]{8}\.").expect("slug pattern is a valid regex"));

/// Strip every fingerprint slug from `name`.
///
/// Each match is replaced by a single `.`. Replacement runs until no slug
/// remains, since removing one slug can expose another
/// (`x-aaaaaaaa-bbbbbbbb.css` becomes `x-aaaaaaaa.css` after one pass). The
/// result is therefore stable: canonicalizing it again changes nothing.
pub fn canonicalize(name: &str) -> String {
  let mut current = name.to_string();
  loop {
    match SLUG_PATTERN.replace_all(&current, ".") {
      Cow::Borrowed(_) => return current,
      Cow::Owned(next) => current = next,
    }
  }
}

/// Embed `slug` in `name` just before its extension.
///
/// The extension starts at the last `.`; a name without one gets the slug
/// appended (`Makefile` -> `Makefile-<slug>`), which [`canonicalize`] cannot
/// strip again.
pub fn insert_fingerprint(name: &str, slug: &str) -> String {
  let (stem, ext) = split_extension(name);
  format!("{stem}{FINGERPRINT_SEPARATOR}{slug}{ext}")
}

/// Split a file name at its last `.`, keeping the dot with the extension.
pub fn split_extension(name: &str) -> (&str, &str) {
  match name.rfind('.') {
    Some(idx) => name.split_at(idx),
    None => (name, ""),
  }
}
