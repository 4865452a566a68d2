//! Shared utilities.
//!
//! Common utilities used across the crate: content hashing.

pub mod hash;
