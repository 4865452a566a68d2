//! pagekit-lib: fingerprinted asset manifests and page rendering
//!
//! This crate provides the logic behind the `pagekit` commands:
//! - `slug`: strip and insert 8-hex-digit fingerprints in file names
//! - `manifest`: resolve fingerprinted files to one newest file per logical name
//! - `lookup`: the read-only `AssetLookup` surface templates call into
//! - `template`: parse and render page templates
//! - `page`: render an entry page, or export the built-in template
//! - `rename`: move a file to a name carrying its content hash
//! - `watch`: block until a watched directory changes

pub mod consts;
pub mod lookup;
pub mod manifest;
pub mod page;
pub mod rename;
pub mod slug;
pub mod template;
pub mod util;
pub mod watch;
