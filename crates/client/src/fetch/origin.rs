//! Origin canonicalization and cache-key derivation.

use beacon_core::{Error, ResolutionKey};
use url::Url;

/// Error type for URL canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("missing host: {0}")]
    MissingHost(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<UrlError> for Error {
    fn from(err: UrlError) -> Self {
        Error::InvalidUrl(err.to_string())
    }
}

/// Canonicalize a URL string.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Default scheme to https:// if missing
/// 3. Lowercase the host
/// 4. Remove fragment (#...)
pub fn canonicalize(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

    let mut parsed = Url::parse(&url_str).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str() {
        let host = host.to_lowercase();
        parsed
            .set_host(Some(&host))
            .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Scheme + host (+ port) of a web resource, with the cache key derived from it.
///
/// The key is the host (and non-default port) only, so `http://`, `https://`,
/// trailing slashes and paths all collapse onto the same entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    url: Url,
    serialized: String,
    key: ResolutionKey,
}

impl Origin {
    pub fn parse(input: &str) -> Result<Self, UrlError> {
        let url = canonicalize(input)?;
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| UrlError::MissingHost(input.to_string()))?;

        let key = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let serialized = url.origin().ascii_serialization();
        let url = Url::parse(&serialized).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

        Ok(Self { url, serialized, key: ResolutionKey::new(key) })
    }

    /// Origin as `scheme://host[:port]`, without a trailing slash.
    pub fn as_str(&self) -> &str {
        &self.serialized
    }

    /// Root document URL of the origin.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn key(&self) -> &ResolutionKey {
        &self.key
    }

    /// `<origin>/<path>` with any leading slashes on `path` collapsed.
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.serialized, path.trim_start_matches('/'))
    }
}
