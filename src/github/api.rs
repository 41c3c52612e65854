// src/github/api.rs
// =============================================================================
// A small wrapper around the GitHub REST API.
//
// Only two calls are needed to scaffold a kata:
// - list the contents of a directory in the template repository
// - download the raw text of a file (using the download_url GitHub gives us)
//
// Both go through the same request path, which adds authentication and turns
// GitHub's error responses into KataError variants:
// - 403 + "X-RateLimit-Remaining: 0"  -> ApiLimitReached
// - 401                              -> InvalidAuthToken
// - anything else non-2xx            -> HttpStatus
//
// Rust concepts:
// - async fn: every request is non-blocking network I/O
// - #[async_trait]: lets us implement the async ContentFetcher trait
// - url::Url: builds URLs with correctly encoded path segments
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use url::Url;

use super::entry::{DirectoryEntry, Listing};
use super::ContentFetcher;
use crate::error::{KataError, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("kata-bootstrap/", env!("CARGO_PKG_VERSION"));
const RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";

// The Client is reused for every request (connection pooling), and is cheap
// to clone because it's reference counted internally.
#[derive(Debug, Clone)]
pub struct GithubApi {
    client: Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl GithubApi {
    /// Client for api.github.com
    pub fn new(auth_token: Option<String>, timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_API_URL, auth_token, timeout)
    }

    /// Client for any GitHub-compatible API root (tests point this at a mock server)
    pub fn with_base_url(
        base_url: &str,
        auth_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(KataError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        // Every request gets this timeout, so a stuck connection fails
        // instead of holding a worker forever
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            auth_token: auth_token.filter(|token| !token.is_empty()),
        })
    }

    // Builds {base}/repos/{owner}/{repo}/contents[/{path}]
    //
    // Example:
    //   ("swkBerlin", "kata-bootstrap", "java/junit5")
    //   -> https://api.github.com/repos/swkBerlin/kata-bootstrap/contents/java/junit5
    fn contents_url(&self, owner: &str, repo: &str, path: &str) -> Url {
        let mut url = self.base_url.clone();

        // cannot_be_a_base() was ruled out in the constructor, so this is Ok
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", owner, repo, "contents"])
                .extend(path.split('/').filter(|segment| !segment.is_empty()));
        }

        url
    }

    async fn get_url(&self, url: &str) -> Result<Response> {
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github.v3+json");

        if let Some(token) = &self.auth_token {
            request = request.header(AUTHORIZATION, format!("token {token}"));
        }

        let response = request.send().await?;
        self.validate_response(response)
    }

    fn validate_response(&self, response: Response) -> Result<Response> {
        let status = response.status();

        if status == StatusCode::FORBIDDEN && rate_limit_remaining(&response) == Some(0) {
            return Err(KataError::ApiLimitReached);
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(KataError::InvalidAuthToken {
                token: self.auth_token.clone().unwrap_or_default(),
            });
        }

        if !status.is_success() {
            return Err(KataError::HttpStatus {
                url: response.url().to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

// Reads the X-RateLimit-Remaining header
// Returns None when it's missing or not a number
fn rate_limit_remaining(response: &Response) -> Option<i64> {
    response
        .headers()
        .get(RATE_LIMIT_REMAINING)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

#[async_trait]
impl ContentFetcher for GithubApi {
    async fn list_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<DirectoryEntry>> {
        let url = self.contents_url(owner, repo, path);
        tracing::debug!(%url, "listing repository contents");

        let response = self.get_url(url.as_str()).await?;
        let body = response.text().await?;
        let listing: Listing = serde_json::from_str(&body)?;

        Ok(listing.into())
    }

    async fn fetch_raw(&self, download_reference: &str) -> Result<Vec<u8>> {
        tracing::debug!(url = download_reference, "downloading raw file");

        // Bytes, not text: templates may ship jars and images
        let response = self.get_url(download_reference).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
