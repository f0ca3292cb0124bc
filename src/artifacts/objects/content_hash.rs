//! Content hash (remote version token)
//!
//! The hosting API identifies every stored blob and commit by a hexadecimal
//! SHA-1 digest. The editor treats it as an opaque version token: a write is
//! only accepted when the hash it presents matches the server's current one.
//!
//! ## Format
//!
//! - Full: 40 hex characters (SHA-1) or 64 hex characters (SHA-256 repositories)
//! - Short: First 7 characters

use crate::artifacts::objects::{CONTENT_HASH_LENGTH, CONTENT_HASH_SHA256_LENGTH};
use sha1::{Digest, Sha1};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ContentHash(String);

impl ContentHash {
    /// Parse and validate a hash returned by the server
    pub fn try_parse(hash: String) -> anyhow::Result<Self> {
        if hash.len() != CONTENT_HASH_LENGTH && hash.len() != CONTENT_HASH_SHA256_LENGTH {
            anyhow::bail!("invalid content hash length: {}", hash.len());
        }
        if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("invalid content hash characters: {}", hash);
        }
        Ok(Self(hash.to_ascii_lowercase()))
    }

    /// Hash bytes the way git hashes a blob: `blob <size>\0<content>`
    pub fn of_blob(content: &[u8]) -> Self {
        Self::of_object("blob", content)
    }

    pub fn of_object(object_type: &str, content: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(format!("{} {}\0", object_type, content.len()).as_bytes());
        hasher.update(content);

        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn to_short_hash(&self) -> String {
        self.0.chars().take(7).collect()
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
