//! Files read from the remote repository
//!
//! The hosting API transports file bodies as base64. Once decoded, a body is kept
//! as text when it is valid UTF-8 (pages) and as raw bytes otherwise (assets).

use crate::artifacts::objects::content_hash::ContentHash;
use bytes::Bytes;
use derive_new::new;
use std::borrow::Cow;

/// Payload of a file, either a Markdown page or an arbitrary asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Binary(Bytes),
}

impl Content {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Content::Text(text),
            Err(error) => Content::Binary(Bytes::from(error.into_bytes())),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Content::Text(text) => text.as_bytes(),
            Content::Binary(bytes) => bytes.as_ref(),
        }
    }

    /// Text view of the payload; invalid UTF-8 is replaced
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Content::Text(text) => Cow::Borrowed(text),
            Content::Binary(bytes) => String::from_utf8_lossy(bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<Vec<u8>> for Content {
    fn from(bytes: Vec<u8>) -> Self {
        Content::Binary(Bytes::from(bytes))
    }
}

/// A regular file at one branch: its path, current version token and body
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct RemoteFile {
    pub path: String,
    pub hash: ContentHash,
    pub content: Content,
}
