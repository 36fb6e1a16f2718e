use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::types::{Backend, FetchError};

const USER_AGENT: &str = "inference-sim/0.1";
const HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Trait for sources that can produce the raw canned response for a backend
#[async_trait]
pub trait FixtureSource: Send + Sync {
    /// Fetch the raw response body for the given backend
    async fn fetch(&self, backend: Backend) -> Result<String, FetchError>;
}

/// Fetches fixtures over HTTP from a base URL, e.g. a dev server hosting
/// the bundled assets.
pub struct HttpFixtureSource {
    client: Client,
    base_url: Url,
}

impl HttpFixtureSource {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let mut base_url = Url::parse(base_url)?;
        // A base without a trailing slash would drop its last segment on join
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECONDS))
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl FixtureSource for HttpFixtureSource {
    async fn fetch(&self, backend: Backend) -> Result<String, FetchError> {
        let url = self.base_url.join(backend.fixture_path())?;
        debug!("Fetching {} fixture from {}", backend, url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Serves fixtures from a directory on disk. The demo binary points this
/// at the bundled assets.
pub struct DirFixtureSource {
    root: PathBuf,
}

impl DirFixtureSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl FixtureSource for DirFixtureSource {
    async fn fetch(&self, backend: Backend) -> Result<String, FetchError> {
        let path = self.root.join(backend.fixture_path());
        debug!("Reading {} fixture from {}", backend, path.display());

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FetchError::Io {
                path: path.display().to_string(),
                source,
            })
    }
}
