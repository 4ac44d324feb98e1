//! HTTP transport used by every resolver.
//!
//! A fetch is a single attempt: no retries, one fixed timeout enforced by the
//! transport itself. Non-success statuses are reported as transport failures
//! so callers only ever see a body they can classify.

pub mod origin;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode, header};
use url::Url;

pub use origin::{Origin, UrlError, canonicalize};

use beacon_core::Error;

/// Single-attempt timed fetch.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url`, failing with `Error::Timeout` once `timeout` elapses.
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<FetchResponse, Error>;
}

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "beacon/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { user_agent: "beacon/0.1".to_string(), max_bytes: 5 * 1024 * 1024, max_redirects: 5 }
    }
}

impl From<&beacon_core::AppConfig> for FetchConfig {
    fn from(config: &beacon_core::AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), max_bytes: config.max_bytes, ..Default::default() }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

impl FetchResponse {
    /// Decode the body as a JSON document.
    pub fn json(&self) -> Result<serde_json::Value, Error> {
        serde_json::from_slice(&self.bytes).map_err(|e| Error::Decode(format!("{}: {e}", self.url)))
    }
}

/// reqwest-backed [`Transport`].
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }
}

fn map_reqwest(url: &Url, e: reqwest::Error) -> Error {
    if e.is_timeout() { Error::Timeout(url.to_string()) } else { Error::Transport(format!("{url}: {e}")) }
}

#[async_trait]
impl Transport for FetchClient {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<FetchResponse, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url.as_str())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("{url}: status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::Transport(format!("{url}: {len} bytes exceeds {}", self.config.max_bytes)));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await.map_err(|e| map_reqwest(url, e))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::Transport(format!(
                "{url}: {} bytes exceeds {}",
                bytes.len(),
                self.config.max_bytes
            )));
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            url,
            final_url,
            fetch_ms,
            bytes.len()
        );

        Ok(FetchResponse { url: url.clone(), final_url, status, content_type, bytes, fetch_ms })
    }
}
