//! Data sources the loader can read from.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashboard_core::{Error, Result};
use tracing::{debug, warn};
use url::Url;

use crate::config::LoaderConfig;

/// Parsed data-source locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocator {
    Remote(Url),
    Local(PathBuf),
}

impl SourceLocator {
    /// Classifies a locator string. `http`/`https` URLs are remote, `file`
    /// URLs and anything that is not a URL are local paths.
    pub fn parse(locator: &str) -> Result<Self> {
        let locator = locator.trim();
        if locator.is_empty() {
            return Err(Error::source_unavailable(locator, "empty source locator"));
        }

        match Url::parse(locator) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Self::Remote(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Self::Local)
                .map_err(|_| Error::source_unavailable(locator, "invalid file URL")),
            // Anything else, including Windows drive letters parsed as schemes
            _ => Ok(Self::Local(PathBuf::from(locator))),
        }
    }
}

impl std::fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{}", url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Anything that can hand back the raw bytes of a dataset.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Human-readable locator, used in logs and errors.
    fn locator(&self) -> String;

    /// Reads the whole dataset. Failures map to `SourceUnavailable`.
    async fn fetch(&self) -> Result<Bytes>;
}

/// Dataset served over HTTP(S).
pub struct HttpSource {
    url: Url,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl RecordSource for HttpSource {
    fn locator(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<Bytes> {
        debug!(url = %self.url, "Fetching remote dataset");

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Dataset request failed");
                Error::source_unavailable(self.locator(), e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Dataset server returned error");
            return Err(Error::source_unavailable(
                self.locator(),
                format!("server returned {}", status),
            ));
        }

        response
            .bytes()
            .await
            .map_err(|e| Error::source_unavailable(self.locator(), e))
    }
}

/// Dataset on the local filesystem.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSource for FileSource {
    fn locator(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Bytes> {
        debug!(path = %self.path.display(), "Reading local dataset");
        tokio::fs::read(&self.path)
            .await
            .map(Bytes::from)
            .map_err(|e| Error::source_unavailable(self.locator(), e))
    }
}

/// Builds the source named by the configuration.
pub fn source_from_config(config: &LoaderConfig) -> Result<Box<dyn RecordSource>> {
    let source: Box<dyn RecordSource> = match SourceLocator::parse(&config.source)? {
        SourceLocator::Remote(url) => Box::new(HttpSource::new(
            url,
            Duration::from_secs(config.fetch_timeout_secs),
        )?),
        SourceLocator::Local(path) => Box::new(FileSource::new(path)),
    };
    Ok(source)
}
