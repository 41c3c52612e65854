// src/grepo/mod.rs
// =============================================================================
// GRepo: turns a directory of a GitHub repository into files on disk.
//
// Submodules:
// - explorer: recursive, concurrent walk of the remote directory tree
// - normalize: re-roots the found files on the requested sub-path
// - download: concurrent fetch + write of a batch of files
// - pool: the bounded worker pool shared by exploration and downloads
// - models: DownloadableFile and friends
//
// Nothing in here prints to the console; progress goes to tracing.
// =============================================================================

mod download;
mod explorer;
mod models;
mod normalize;
mod pool;

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::github::ContentFetcher;

use download::ConcurrentDownloader;
use explorer::RepoExplorer;
use normalize::normalize;

pub use models::DownloadableFile;
pub use pool::{WorkerPool, DEFAULT_POOL_SIZE};

#[derive(Clone)]
pub struct GRepo {
    explorer: RepoExplorer,
    downloader: ConcurrentDownloader,
}

impl GRepo {
    /// Explorer and downloader share `fetcher` and the same worker pool
    pub fn new(fetcher: Arc<dyn ContentFetcher>, pool: WorkerPool) -> Self {
        tracing::debug!(workers = pool.size(), "worker pool ready");
        Self {
            explorer: RepoExplorer::new(fetcher.clone(), pool.clone()),
            downloader: ConcurrentDownloader::new(fetcher, pool),
        }
    }

    /// Flat list of every file under `path` in owner/repo, with paths
    /// relative to `path`
    pub async fn get_files_to_download(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<DownloadableFile>> {
        let path = path.trim_matches('/');
        let files = self.explorer.explore(owner, repo, path).await?;
        normalize(files, path)
    }

    /// Fetches every file and writes it under `root_dir`
    pub async fn download_files_at_location(
        &self,
        root_dir: &Path,
        files: Vec<DownloadableFile>,
    ) -> Result<()> {
        self.downloader.download(root_dir, files).await
    }
}
