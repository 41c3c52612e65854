// src/testing.rs
// =============================================================================
// An in-memory ContentFetcher for tests.
//
// FakeRepo is built from a list of file paths. Directory listings are derived
// from those paths the same way GitHub would answer them, and each file's
// content is "content of <path>". Individual directories or downloads can be
// made to fail, and the fake records how many requests ran at the same time.
//
// CapturedLogs collects what a warn-level subscriber would print, so tests can
// check that library code stays quiet on the terminal.
// =============================================================================

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tracing::subscriber::DefaultGuard;

use crate::error::{KataError, Result};
use crate::github::{ContentFetcher, DirectoryEntry};

const SCHEME: &str = "mem://";

#[derive(Default)]
pub struct FakeRepo {
    files: BTreeMap<String, String>,
    failing_dirs: HashSet<String>,
    failing_downloads: HashSet<String>,
    latency: Option<Duration>,
    listing_calls: Mutex<Vec<(String, String, String)>>,
    download_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeRepo {
    pub fn with_files(paths: &[&str]) -> Self {
        let files = paths
            .iter()
            .map(|path| (path.to_string(), content_of(path)))
            .collect();

        Self {
            files,
            ..Self::default()
        }
    }

    /// Listing this directory answers 500
    pub fn failing_dir(mut self, dir: &str) -> Self {
        self.failing_dirs.insert(dir.to_string());
        self
    }

    /// Downloading this file answers 500
    pub fn failing_download(mut self, path: &str) -> Self {
        self.failing_downloads.insert(path.to_string());
        self
    }

    /// Downloading any file answers 500
    pub fn failing_every_download(mut self) -> Self {
        self.failing_downloads = self.files.keys().cloned().collect();
        self
    }

    /// Every request sleeps this long, so requests overlap
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn listing_calls(&self) -> Vec<(String, String, String)> {
        self.listing_calls.lock().unwrap().clone()
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn listing(&self, dir: &str) -> Option<Vec<DirectoryEntry>> {
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };

        let mut entries = Vec::new();
        let mut seen_dirs = BTreeSet::new();

        for path in self.files.keys() {
            let Some(rest) = path.strip_prefix(&prefix) else {
                continue;
            };

            match rest.split_once('/') {
                None => entries.push(DirectoryEntry::file(rest, path, &reference_of(path))),
                Some((sub_dir, _)) => {
                    if seen_dirs.insert(sub_dir.to_string()) {
                        entries.push(DirectoryEntry::dir(sub_dir, &format!("{prefix}{sub_dir}")));
                    }
                }
            }
        }

        if !entries.is_empty() || dir.is_empty() {
            return Some(entries);
        }

        // GitHub answers a file path with the file itself
        self.files.get_key_value(dir).map(|(path, _)| {
            let name = path.rsplit('/').next().unwrap_or(path);
            vec![DirectoryEntry::file(name, path, &reference_of(path))]
        })
    }

    async fn simulate_request(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        match self.latency {
            Some(latency) => tokio::time::sleep(latency).await,
            None => tokio::task::yield_now().await,
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContentFetcher for FakeRepo {
    async fn list_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<DirectoryEntry>> {
        self.listing_calls.lock().unwrap().push((
            owner.to_string(),
            repo.to_string(),
            path.to_string(),
        ));
        self.simulate_request().await;

        if self.failing_dirs.contains(path) {
            return Err(server_error(path));
        }

        self.listing(path).ok_or_else(|| KataError::HttpStatus {
            url: format!("{SCHEME}{path}"),
            status: 404,
        })
    }

    async fn fetch_raw(&self, download_reference: &str) -> Result<Vec<u8>> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_request().await;

        let path = download_reference
            .strip_prefix(SCHEME)
            .unwrap_or(download_reference);

        if self.failing_downloads.contains(path) {
            return Err(server_error(path));
        }

        self.files.get(path).map(|content| content.clone().into_bytes()).ok_or_else(|| KataError::HttpStatus {
            url: download_reference.to_string(),
            status: 404,
        })
    }
}

pub fn content_of(path: &str) -> String {
    format!("content of {path}")
}

pub fn reference_of(path: &str) -> String {
    format!("{SCHEME}{path}")
}

fn server_error(path: &str) -> KataError {
    KataError::HttpStatus {
        url: format!("{SCHEME}{path}"),
        status: 500,
    }
}

#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Routes this thread's events at warn and above into the returned buffer
/// until the guard is dropped (same level the CLI shows without -v)
pub fn capture_warnings() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    (logs, tracing::subscriber::set_default(subscriber))
}
