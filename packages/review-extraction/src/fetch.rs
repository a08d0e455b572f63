//! Listing page fetch collaborator.
//!
//! [`PageFetcher`] is the seam the pipeline depends on; [`HttpFetcher`] is the
//! reqwest implementation with a browser-like identity, a bounded timeout and
//! a small number of retries for transient failures.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};

/// Browser-like User-Agent; review sites serve bot user agents a challenge page.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Fetches the raw HTML of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult<String>;
}

/// Settings for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    /// Total attempts per fetch, including the first (minimum 1)
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            max_attempts: 2,
            retry_delay: Duration::from_secs(2),
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

/// reqwest-backed page fetcher.
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new() -> FetchResult<Self> {
        Self::with_config(FetchConfig::default())
    }

    pub fn with_config(config: FetchConfig) -> FetchResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("nl-NL,nl;q=0.9,en;q=0.8"),
        );

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn fetch_once(&self, url: &str) -> FetchResult<String> {
        let response = self.client.get(url).send().await.map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| classify(url, e))
    }
}

fn classify(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        let attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            debug!(url = %url, attempt, "Fetching review page");
            match self.fetch_once(url).await {
                Ok(html) => return Ok(html),
                Err(e) if attempt < attempts && e.is_transient() => {
                    warn!(url = %url, attempt, error = %e, "Fetch failed, retrying");
                    tokio::time::sleep(self.config.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
