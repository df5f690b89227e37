// src/fetch/mod.rs

use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};
use url::Url;

const USER_AGENT: &str = concat!("dsbplan/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("building HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("GET {url} failed: {source}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("GET {url} returned {status}")]
    Status { url: Url, status: StatusCode },
    #[error("reading body from {url}: {source}")]
    Body {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
}

/// HTTP client for plan documents, with bounded retry.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_retries: u32,
    backoff_ms: u64,
}

impl Fetcher {
    pub fn new(timeout: Duration, max_retries: u32, backoff_ms: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self::with_client(client, max_retries, backoff_ms))
    }

    pub fn with_client(client: Client, max_retries: u32, backoff_ms: u64) -> Self {
        Self {
            client,
            max_retries,
            backoff_ms,
        }
    }

    /// One GET; any non-success status is an error.
    pub async fn fetch_text(&self, url: &Url) -> Result<String, FetchError> {
        debug!("Fetching text from {}", url);
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.clone(),
                status,
            });
        }
        resp.text().await.map_err(|source| FetchError::Body {
            url: url.clone(),
            source,
        })
    }

    #[instrument(level = "debug", skip(self, url), fields(url = %url))]
    pub async fn fetch_with_retry(&self, url: &Url) -> Result<String, FetchError> {
        let mut attempts = 0;
        loop {
            match self.fetch_text(url).await {
                Ok(t) => return Ok(t),
                Err(e) if attempts < self.max_retries => {
                    attempts += 1;
                    let backoff = backoff_delay(self.backoff_ms, attempts);
                    warn!(%url, attempt = attempts, delay_ms = backoff.as_millis() as u64, error = %e, "Retrying");
                    sleep(backoff).await;
                }
                Err(e) => {
                    error!(%url, error = %e, "Exhausted retries");
                    return Err(e);
                }
            }
        }
    }
}

/// `initial * 2^(attempt-1)`, saturating.
fn backoff_delay(initial_ms: u64, attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_millis(initial_ms.saturating_mul(factor))
}
