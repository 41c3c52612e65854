// src/github/mod.rs
// =============================================================================
// This module handles talking to GitHub.
//
// The rest of the tool never calls GitHub directly: it depends on the
// ContentFetcher trait below. GithubApi is the real implementation; tests
// plug in an in-memory fake instead.
//
// Rust concepts:
// - Traits: describe a capability without tying callers to one implementation
// - Send + Sync: the fetcher is shared between many spawned tasks
// =============================================================================

mod api;
mod entry;

use async_trait::async_trait;

use crate::error::Result;

pub use api::GithubApi;
pub use entry::DirectoryEntry;

/// Read access to a remote repository's files
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Lists the entries of the directory at `path` ("" for the repository root)
    async fn list_contents(&self, owner: &str, repo: &str, path: &str)
        -> Result<Vec<DirectoryEntry>>;

    /// Downloads the raw bytes behind a file's download reference
    async fn fetch_raw(&self, download_reference: &str) -> Result<Vec<u8>>;
}
