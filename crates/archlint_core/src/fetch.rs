//! Fragment fetching.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use archlint_model::Locator;

use crate::CoreError;

/// Maximum size for a fetched fragment (10MB).
pub const MAX_FRAGMENT_SIZE: u64 = 10 * 1024 * 1024;

/// Timeout applied to remote fragment fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for fragment fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Fragment not found at the locator.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network request failed.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Remote fetch exceeded the fetch timeout.
    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),

    /// Fragment exceeds the size limit.
    #[error("Fragment too large: {size} bytes (max {max} bytes)")]
    TooLarge {
        /// Observed size.
        size: u64,
        /// Allowed maximum.
        max: u64,
    },

    /// The locator scheme is not supported by this fetcher.
    #[error("Unsupported locator: {0}")]
    UnsupportedLocator(String),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Future returned by [`FragmentFetcher::fetch`].
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<String, FetchError>> + Send>>;

/// Produces raw fragment content for a locator.
///
/// Fetches may suspend (file I/O, network); the resolver spawns them as
/// independent tasks and settles the results, so implementations must be
/// shareable across tasks.
pub trait FragmentFetcher: Send + Sync {
    /// Fetches the raw content behind `locator`.
    fn fetch(&self, locator: &Locator) -> FetchFuture;
}

/// The stock fetcher: workspace-relative `file://` locators plus
/// `https://` locators with a size limit and fetch timeout.
pub struct WorkspaceFetcher {
    workspace: PathBuf,
    root_file: String,
    http: reqwest::Client,
    fetch_timeout: Duration,
}

impl WorkspaceFetcher {
    /// Creates a fetcher rooted at `workspace`.
    ///
    /// The workspace directory must exist; a missing directory is a
    /// malformed-input error detected before any session starts.
    /// `root_file` is the workspace-relative file the `$root$` locator
    /// resolves to.
    pub fn new(
        workspace: impl Into<PathBuf>,
        root_file: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let workspace = workspace.into();
        if !workspace.is_dir() {
            return Err(CoreError::workspace(format!(
                "Workspace directory does not exist: {}",
                workspace.display()
            )));
        }

        Ok(Self {
            workspace,
            root_file: root_file.into(),
            http: reqwest::Client::new(),
            fetch_timeout: FETCH_TIMEOUT,
        })
    }

    /// Overrides the remote fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Maps a `file://` locator to a path inside the workspace.
    ///
    /// Rejects absolute paths and `..` components so a fragment cannot
    /// reference files outside the workspace.
    fn file_target(&self, locator: &Locator) -> Result<PathBuf, FetchError> {
        let relative = locator
            .file_path()
            .ok_or_else(|| FetchError::UnsupportedLocator(locator.to_string()))?;

        if relative == "/$root$" {
            return Ok(self.workspace.join(&self.root_file));
        }

        let path = Path::new(relative);
        if path.is_absolute()
            || path
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(FetchError::UnsupportedLocator(locator.to_string()));
        }

        Ok(self.workspace.join(path))
    }

    async fn fetch_file(path: PathBuf) -> Result<String, FetchError> {
        if !path.exists() {
            return Err(FetchError::NotFound(format!(
                "Fragment file not found: {}",
                path.display()
            )));
        }

        use tokio::io::AsyncReadExt;
        let file = tokio::fs::File::open(&path).await?;
        let mut content = String::new();
        let read = file
            .take(MAX_FRAGMENT_SIZE + 1)
            .read_to_string(&mut content)
            .await?;
        if read as u64 > MAX_FRAGMENT_SIZE {
            return Err(FetchError::TooLarge {
                size: read as u64,
                max: MAX_FRAGMENT_SIZE,
            });
        }

        Ok(content)
    }

    async fn fetch_http(
        client: reqwest::Client,
        url: String,
        fetch_timeout: Duration,
    ) -> Result<String, FetchError> {
        debug!("Fetching remote fragment: {}", url);

        let request = async {
            let response = client.get(&url).send().await?;
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Err(FetchError::NotFound(url.clone()));
            }
            let response = response.error_for_status()?;
            let bytes = response.bytes().await?;
            if bytes.len() as u64 > MAX_FRAGMENT_SIZE {
                return Err(FetchError::TooLarge {
                    size: bytes.len() as u64,
                    max: MAX_FRAGMENT_SIZE,
                });
            }
            String::from_utf8(bytes.to_vec()).map_err(|e| {
                FetchError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            })
        };

        match tokio::time::timeout(fetch_timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(fetch_timeout)),
        }
    }
}

impl FragmentFetcher for WorkspaceFetcher {
    fn fetch(&self, locator: &Locator) -> FetchFuture {
        if locator.is_file() {
            let target = self.file_target(locator);
            return Box::pin(async move { Self::fetch_file(target?).await });
        }

        if locator.is_http() {
            let client = self.http.clone();
            let url = locator.to_string();
            let fetch_timeout = self.fetch_timeout;
            return Box::pin(Self::fetch_http(client, url, fetch_timeout));
        }

        let message = locator.to_string();
        Box::pin(async move { Err(FetchError::UnsupportedLocator(message)) })
    }
}
