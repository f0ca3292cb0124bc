//! Remote repository objects
//!
//! - `content_hash`: Version tokens used for optimistic concurrency
//! - `remote_file`: Decoded file bodies read from a branch
//! - `tree_entry`: Entries of a flattened recursive tree listing

pub mod content_hash;
pub mod remote_file;
pub mod tree_entry;

/// Length of a SHA-1 hash in hexadecimal format
pub const CONTENT_HASH_LENGTH: usize = 40;
/// Length of a SHA-256 hash in hexadecimal format
pub const CONTENT_HASH_SHA256_LENGTH: usize = 64;
