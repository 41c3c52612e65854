// src/github/entry.rs
// =============================================================================
// One item of a GitHub "contents" listing.
//
// GET /repos/{owner}/{repo}/contents/{path} answers with a JSON array of
// entries when {path} is a directory, or a single entry object when it's a
// file. We only keep the four fields the explorer needs.
// =============================================================================

use serde::{Deserialize, Serialize};

/// What kind of thing a listing entry is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Dir,
    /// symlink, submodule, or anything GitHub adds later
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    /// Path from the repository root, e.g. "java/junit5/README.md"
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Raw download URL, only present for files
    #[serde(rename = "download_url", default)]
    pub download_reference: Option<String>,
}

#[cfg(test)]
impl DirectoryEntry {
    pub fn file(name: &str, path: &str, download_reference: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            entry_type: EntryType::File,
            download_reference: Some(download_reference.to_string()),
        }
    }

    pub fn dir(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            entry_type: EntryType::Dir,
            download_reference: None,
        }
    }
}

impl DirectoryEntry {
    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Dir
    }
}

/// The contents endpoint returns either a list or a single object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing {
    Many(Vec<DirectoryEntry>),
    One(DirectoryEntry),
}

impl From<Listing> for Vec<DirectoryEntry> {
    fn from(listing: Listing) -> Self {
        match listing {
            Listing::Many(entries) => entries,
            Listing::One(entry) => vec![entry],
        }
    }
}
