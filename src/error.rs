// src/error.rs
// =============================================================================
// Every error the kata tool can produce, in one enum.
//
// The core (GitHub client, explorer, downloader, config, services) returns
// KataError so the CLI can match on specific failures and print a helpful
// message. main.rs wraps anything unexpected in anyhow.
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[from]: lets the ? operator convert io/json/yaml/reqwest errors for us
// =============================================================================

use std::path::PathBuf;

use thiserror::Error;

use crate::kata::{KataLanguage, KataTemplate};

/// Result type used across the crate
pub type Result<T> = std::result::Result<T, KataError>;

#[derive(Debug, Error)]
pub enum KataError {
    /// GitHub answered 403 with no remaining quota
    #[error("Api limit has been reached")]
    ApiLimitReached,

    /// GitHub answered 401 for the configured token
    #[error("The token used for authentication is invalid | Token: '{token}'")]
    InvalidAuthToken { token: String },

    /// Any other non-success HTTP response
    #[error("HTTP {status} while fetching {url}")]
    HttpStatus { url: String, status: u16 },

    /// Transport failure: DNS, TLS, connection reset, timeout...
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Root dir '{}' is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("Please create an empty '{}' directory before proceeding", .path.display())]
    SandboxMissing { path: PathBuf },

    #[error("Please create an EMPTY '{}' directory before proceeding", .path.display())]
    SandboxNotEmpty { path: PathBuf },

    #[error("Invalid Directory: '{}'", .path.display())]
    ParentDirNotFound { path: PathBuf },

    #[error("Kata name '{name}' is invalid!{}", .reason.as_ref().map(|r| format!(" ({r})")).unwrap_or_default())]
    InvalidKataName {
        name: String,
        reason: Option<String>,
    },

    #[error("Kata language could not be found")]
    KataLanguageNotFound { available: Vec<KataLanguage> },

    #[error("Kata template could not be found")]
    KataTemplateNotFound { available: Vec<KataTemplate> },

    #[error("Invalid config: {message}")]
    InvalidConfig { message: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    /// A remote path that can't safely be written under a local root
    #[error("Invalid file path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// The API returned a file outside the sub-path we asked for
    #[error("File '{}' is not located under the requested sub-path '{sub_path}'", .path.display())]
    PathOutsideSubPath { path: PathBuf, sub_path: String },

    #[error("Worker pool was closed")]
    WorkerPoolClosed,

    /// A spawned exploration or download task panicked or was cancelled
    #[error("Background task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl KataError {
    /// True for errors reported by the GitHub API itself (quota, auth)
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            KataError::ApiLimitReached | KataError::InvalidAuthToken { .. }
        )
    }

    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        KataError::InvalidConfig {
            message: message.into(),
        }
    }
}
