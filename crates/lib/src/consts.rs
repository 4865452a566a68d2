//! Shared constants.

/// Number of lowercase hex digits in a fingerprint slug.
pub const FINGERPRINT_LEN: usize = 8;

/// Separator placed between a file stem and its fingerprint when renaming.
pub const FINGERPRINT_SEPARATOR: char = '-';

/// Page base name used when no input document is given.
pub const DEFAULT_PAGE_BASE_NAME: &str = "index";

/// Buffer size for streaming file contents into the hasher.
pub const HASH_READ_BUFFER: usize = 8192;
