// src/grepo/download.rs
// =============================================================================
// Downloads a batch of files concurrently and writes them under a local root.
//
// How it works:
// 1. Make sure the root directory exists (create it) and is a directory
// 2. Spawn one fetch task per file; the WorkerPool limits how many run at once
// 3. As each fetch finishes (completion order, not submission order), write
//    its bytes to root/relative_path, creating parent directories as needed
//
// Writes overwrite existing files, so running the same download twice gives
// the same result.
//
// Failure policy: fail fast. The first failed fetch or write stops the batch:
// the remaining fetch tasks are aborted and the error is returned. Files that
// were already written stay on disk.
// =============================================================================

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinSet;

use super::models::{DownloadableFile, DownloadedFile};
use super::pool::WorkerPool;
use crate::error::{KataError, Result};
use crate::github::ContentFetcher;

#[derive(Clone)]
pub struct ConcurrentDownloader {
    fetcher: Arc<dyn ContentFetcher>,
    pool: WorkerPool,
}

impl ConcurrentDownloader {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, pool: WorkerPool) -> Self {
        Self { fetcher, pool }
    }

    pub async fn download(&self, root_dir: &Path, files: Vec<DownloadableFile>) -> Result<()> {
        prepare_root_dir(root_dir).await?;

        let total = files.len();
        let mut downloads = JoinSet::new();

        for file in files {
            let fetcher = self.fetcher.clone();
            let pool = self.pool.clone();
            downloads.spawn(async move { download_one(fetcher, pool, file).await });
        }

        let mut written = 0;
        while let Some(joined) = downloads.join_next().await {
            let downloaded = match joined {
                Ok(Ok(downloaded)) => downloaded,
                Ok(Err(err)) => return Err(abort_batch(&mut downloads, err)),
                Err(join_err) => return Err(abort_batch(&mut downloads, join_err.into())),
            };

            if let Err(err) = write_in_sub_path(root_dir, &downloaded).await {
                return Err(abort_batch(&mut downloads, err));
            }
            written += 1;
        }

        tracing::info!(root = %root_dir.display(), files = written, total, "download complete");
        Ok(())
    }
}

async fn download_one(
    fetcher: Arc<dyn ContentFetcher>,
    pool: WorkerPool,
    file: DownloadableFile,
) -> Result<DownloadedFile> {
    let content = pool.run(fetcher.fetch_raw(file.download_reference())).await?;

    Ok(DownloadedFile {
        relative_path: file.into_relative_path(),
        content,
    })
}

fn abort_batch(downloads: &mut JoinSet<Result<DownloadedFile>>, err: KataError) -> KataError {
    tracing::debug!(
        error = %err,
        cancelled = downloads.len(),
        "download failed, cancelling remaining files"
    );
    downloads.abort_all();
    err
}

// Creates root_dir if it's missing, rejects it if it's something else
async fn prepare_root_dir(root_dir: &Path) -> Result<()> {
    match tokio::fs::metadata(root_dir).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(KataError::NotADirectory {
            path: root_dir.to_path_buf(),
        }),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tokio::fs::create_dir_all(root_dir).await?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

async fn write_in_sub_path(root_dir: &Path, file: &DownloadedFile) -> Result<()> {
    let full_path = root_dir.join(&file.relative_path);

    if let Some(parent) = full_path.parent() {
        // create_dir_all is a no-op for directories that already exist
        tokio::fs::create_dir_all(parent).await?;
    }

    tokio::fs::write(&full_path, &file.content).await?;
    tracing::debug!(path = %full_path.display(), "wrote file");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{capture_warnings, content_of, reference_of, FakeRepo};
    use std::time::Duration;
    use tempfile::TempDir;

    fn files(paths: &[&str]) -> Vec<DownloadableFile> {
        paths
            .iter()
            .map(|path| DownloadableFile::new(*path, reference_of(path)).unwrap())
            .collect()
    }

    fn build_downloader(repo: FakeRepo, pool_size: usize) -> (ConcurrentDownloader, Arc<FakeRepo>) {
        let repo = Arc::new(repo);
        let downloader = ConcurrentDownloader::new(repo.clone(), WorkerPool::new(pool_size));
        (downloader, repo)
    }

    #[tokio::test]
    async fn test_writes_every_file_under_root() {
        let paths = ["a.txt", "sub/b.txt", "sub/deeper/c.txt"];
        let (downloader, _) = build_downloader(FakeRepo::with_files(&paths), 4);
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("kata");

        downloader.download(&root, files(&paths)).await.unwrap();

        for path in paths {
            let written = std::fs::read_to_string(root.join(path)).unwrap();
            assert_eq!(written, content_of(path));
        }
    }

    #[tokio::test]
    async fn test_creates_missing_root_dir() {
        let (downloader, _) = build_downloader(FakeRepo::with_files(&["a.txt"]), 4);
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("nested").join("kata");

        downloader.download(&root, files(&["a.txt"])).await.unwrap();

        assert!(root.is_dir());
        assert!(root.join("a.txt").is_file());
    }

    #[tokio::test]
    async fn test_root_that_is_a_file_is_rejected_before_any_fetch() {
        let (downloader, repo) = build_downloader(FakeRepo::with_files(&["a.txt"]), 4);
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("not-a-dir");
        std::fs::write(&root, "occupied").unwrap();

        let result = downloader.download(&root, files(&["a.txt"])).await;

        assert!(matches!(result, Err(KataError::NotADirectory { .. })));
        assert_eq!(repo.download_calls(), 0);
        assert_eq!(std::fs::read_to_string(&root).unwrap(), "occupied");
    }

    #[tokio::test]
    async fn test_download_twice_overwrites() {
        let paths = ["a.txt", "sub/b.txt"];
        let (downloader, _) = build_downloader(FakeRepo::with_files(&paths), 4);
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().to_path_buf();
        std::fs::write(root.join("a.txt"), "stale content that is longer").unwrap();

        downloader.download(&root, files(&paths)).await.unwrap();
        downloader.download(&root, files(&paths)).await.unwrap();

        assert_eq!(std::fs::read_to_string(root.join("a.txt")).unwrap(), content_of("a.txt"));
        assert_eq!(std::fs::read_dir(&root).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_fails_the_batch() {
        let paths = ["a.txt", "b.txt", "c.txt"];
        let repo = FakeRepo::with_files(&paths).failing_download("b.txt");
        let (downloader, _) = build_downloader(repo, 4);
        let tmp = TempDir::new().unwrap();

        let result = downloader.download(tmp.path(), files(&paths)).await;

        assert!(matches!(
            result,
            Err(KataError::HttpStatus { status: 500, .. })
        ));
        assert!(!tmp.path().join("b.txt").exists());
    }

    #[tokio::test]
    async fn test_first_failure_cancels_remaining_downloads() {
        let paths: Vec<String> = (0..50).map(|i| format!("file_{i}.txt")).collect();
        let paths: Vec<&str> = paths.iter().map(String::as_str).collect();
        let repo = FakeRepo::with_files(&paths)
            .failing_every_download()
            .with_latency(Duration::from_millis(20));
        let (downloader, repo) = build_downloader(repo, 1);
        let tmp = TempDir::new().unwrap();

        let result = downloader.download(tmp.path(), files(&paths)).await;
        assert!(matches!(
            result,
            Err(KataError::HttpStatus { status: 500, .. })
        ));

        // Left running, the queue would go through ~15 more fetches by now
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(repo.download_calls() < 5, "{} fetches ran", repo.download_calls());
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_failed_batch_logs_nothing_at_default_level() {
        let (logs, _guard) = capture_warnings();
        let repo = FakeRepo::with_files(&["a.txt", "b.txt"]).failing_download("a.txt");
        let (downloader, _) = build_downloader(repo, 1);
        let tmp = TempDir::new().unwrap();

        assert!(downloader.download(tmp.path(), files(&["a.txt", "b.txt"])).await.is_err());

        assert_eq!(logs.contents(), "");
    }

    #[tokio::test]
    async fn test_respects_pool_size() {
        let paths: Vec<String> = (0..30).map(|i| format!("file_{i}.txt")).collect();
        let paths: Vec<&str> = paths.iter().map(String::as_str).collect();
        let repo = FakeRepo::with_files(&paths).with_latency(Duration::from_millis(5));
        let (downloader, repo) = build_downloader(repo, 4);
        let tmp = TempDir::new().unwrap();

        downloader.download(tmp.path(), files(&paths)).await.unwrap();

        assert_eq!(repo.download_calls(), 30);
        assert!(repo.max_in_flight() <= 4);
        assert!(repo.max_in_flight() > 1);
    }

    #[tokio::test]
    async fn test_empty_batch_only_creates_root() {
        let (downloader, repo) = build_downloader(FakeRepo::default(), 4);
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("empty");

        downloader.download(&root, Vec::new()).await.unwrap();

        assert!(root.is_dir());
        assert_eq!(repo.download_calls(), 0);
    }
}
