//! Flat tree listing entries
//!
//! A branch's tree is listed recursively and flattened: every blob and every
//! subtree appears once, keyed by its full posix path from the repository root.

use crate::artifacts::objects::content_hash::ContentHash;
use derive_new::new;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Map the hosting API's object type (`blob`, `tree`, `commit`)
    ///
    /// Submodules (`commit`) are neither editable files nor browsable
    /// directories and map to `None`.
    pub fn from_object_type(object_type: &str) -> Option<Self> {
        match object_type {
            "blob" => Some(EntryKind::File),
            "tree" => Some(EntryKind::Directory),
            _ => None,
        }
    }

    pub fn as_object_type(&self) -> &'static str {
        match self {
            EntryKind::File => "blob",
            EntryKind::Directory => "tree",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, new)]
pub struct TreeEntry {
    pub path: String,
    pub kind: EntryKind,
    pub hash: Option<ContentHash>,
}

impl TreeEntry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}
