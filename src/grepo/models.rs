// src/grepo/models.rs
// =============================================================================
// The values passed between the explorer and the downloader.
//
// A DownloadableFile can only be built through DownloadableFile::new, which
// checks that its path is safe to join onto a local directory: relative,
// non-empty, and without any ".." component. Once built, the fields can't be
// changed, so everything downstream can trust them.
// =============================================================================

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::error::{KataError, Result};

/// A remote file: where it goes locally, and how to fetch it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DownloadableFile {
    relative_path: PathBuf,
    download_reference: String,
}

impl DownloadableFile {
    pub fn new(
        relative_path: impl Into<PathBuf>,
        download_reference: impl Into<String>,
    ) -> Result<Self> {
        let relative_path = relative_path.into();
        validate_relative_path(&relative_path)?;

        Ok(Self {
            relative_path,
            download_reference: download_reference.into(),
        })
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    pub fn download_reference(&self) -> &str {
        &self.download_reference
    }

    /// Same download reference, different local path (validated again)
    pub(crate) fn relocated(self, relative_path: PathBuf) -> Result<Self> {
        Self::new(relative_path, self.download_reference)
    }

    pub(crate) fn into_relative_path(self) -> PathBuf {
        self.relative_path
    }
}

/// The bytes fetched for one DownloadableFile, waiting to be written
#[derive(Debug)]
pub(crate) struct DownloadedFile {
    pub relative_path: PathBuf,
    pub content: Vec<u8>,
}

fn validate_relative_path(path: &Path) -> Result<()> {
    let invalid = |reason| KataError::InvalidPath {
        path: path.display().to_string(),
        reason,
    };

    if path.as_os_str().is_empty() {
        return Err(invalid("path is empty"));
    }

    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return Err(invalid("path must not contain '..'")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("path must be relative"))
            }
        }
    }

    Ok(())
}
