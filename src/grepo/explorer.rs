// src/grepo/explorer.rs
// =============================================================================
// Walks a directory of a remote repository and returns every file under it.
//
// How it works:
// 1. List the directory
// 2. Keep its files as DownloadableFiles
// 3. Spawn one task per sub-directory, each doing steps 1-4 for that directory
// 4. Wait for all of them (in whatever order they finish) and merge the files
//
// Sibling directories are explored at the same time, because each listing is
// a network round-trip and waiting on them one by one would be slow.
// There is no depth limit: one task per directory, bounded only by the
// WorkerPool for the actual requests.
//
// If any listing fails, the whole exploration fails. Returning from the
// function drops the JoinSet, which aborts the sibling tasks still running.
//
// Rust concepts:
// - JoinSet: a collection of spawned tasks we can await as they complete
// - BoxFuture: an async fn can't call itself directly, so we box the future
// - Arc<dyn Trait>: one fetcher shared by every spawned task
// =============================================================================

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tokio::task::JoinSet;

use super::models::DownloadableFile;
use super::pool::WorkerPool;
use crate::error::Result;
use crate::github::{ContentFetcher, DirectoryEntry};

#[derive(Clone)]
pub struct RepoExplorer {
    fetcher: Arc<dyn ContentFetcher>,
    pool: WorkerPool,
}

// owner + repo, shared by every task of one exploration
struct RepoTarget {
    owner: String,
    repo: String,
}

impl RepoExplorer {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, pool: WorkerPool) -> Self {
        Self { fetcher, pool }
    }

    /// Every file under `path` in owner/repo, with repo-relative paths
    ///
    /// The order of the returned files is unspecified.
    pub async fn explore(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<DownloadableFile>> {
        let target = Arc::new(RepoTarget {
            owner: owner.to_string(),
            repo: repo.to_string(),
        });

        let files = self.clone().explore_dir(target, path.to_string()).await?;
        tracing::info!(owner, repo, path, files = files.len(), "explored repository");

        Ok(files)
    }

    // Returns a 'static boxed future so it can be handed to tokio::spawn
    // and so it can call itself for sub-directories.
    fn explore_dir(
        self,
        target: Arc<RepoTarget>,
        dir_path: String,
    ) -> BoxFuture<'static, Result<Vec<DownloadableFile>>> {
        async move {
            let entries = self
                .pool
                .run(
                    self.fetcher
                        .list_contents(&target.owner, &target.repo, &dir_path),
                )
                .await?;

            let (files, sub_dirs): (Vec<DirectoryEntry>, Vec<DirectoryEntry>) = entries
                .into_iter()
                .filter(|entry| entry.is_file() || entry.is_dir())
                .partition(DirectoryEntry::is_file);

            tracing::debug!(
                dir = %dir_path,
                files = files.len(),
                sub_dirs = sub_dirs.len(),
                "listed directory"
            );

            let mut found = Vec::with_capacity(files.len());
            for entry in files {
                if let Some(file) = to_downloadable(entry)? {
                    found.push(file);
                }
            }

            // Fan out: one task per sub-directory
            let mut children = JoinSet::new();
            for sub_dir in &sub_dirs {
                let child_path = child_path(&dir_path, &sub_dir.name);
                children.spawn(self.clone().explore_dir(target.clone(), child_path));
            }

            // Fan in, in completion order. The first error returns early and
            // dropping `children` aborts whatever is still running.
            while let Some(joined) = children.join_next().await {
                found.extend(joined??);
            }

            Ok(found)
        }
        .boxed()
    }
}

// "" + "src" -> "src", "java" + "src" -> "java/src"
fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

fn to_downloadable(entry: DirectoryEntry) -> Result<Option<DownloadableFile>> {
    match entry.download_reference {
        Some(reference) => Ok(Some(DownloadableFile::new(entry.path, reference)?)),
        None => {
            tracing::debug!(path = %entry.path, "file has no download url, skipping");
            Ok(None)
        }
    }
}
