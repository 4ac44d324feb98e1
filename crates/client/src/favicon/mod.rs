//! Favicon resolution with a three-stage fallback chain.
//!
//! For an origin that is not cached yet:
//!
//! 1. fetch `<origin>/favicon.ico`; an image body wins.
//! 2. fetch the root document, take the first `<link rel~="icon">` and fetch
//!    what it points at; an image body wins.
//! 3. store a 1x1 transparent placeholder.
//!
//! Stages run strictly in order and every stage failure is absorbed, so a
//! well-formed origin always resolves to a cached record. The placeholder is
//! stored like any other icon; [`is_placeholder`] tells them apart.

pub mod link;

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use url::Url;

use beacon_core::{CacheRecord, Error, Payload, RecordCache};

use crate::classify::ContentKind;
use crate::fetch::{Origin, Transport};
use crate::transcode::{to_inline_image, to_text};

pub use link::{find_icon_href, resolve_icon_href};

/// Durable-store key of the favicon namespace.
pub const FAVICON_NAMESPACE: &str = "favicon-cache";

/// 1x1 transparent GIF stored when every stage fails.
pub const NO_IMAGE: &str = "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

/// Whether `record` holds the placeholder rather than a fetched icon.
pub fn is_placeholder(record: &CacheRecord) -> bool {
    record.payload.as_inline_image() == Some(NO_IMAGE)
}

/// Resolves origins to inline icons through the favicon cache.
pub struct FaviconResolver {
    transport: Arc<dyn Transport>,
    cache: Arc<RecordCache>,
    timeout: Duration,
}

impl FaviconResolver {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<RecordCache>, timeout: Duration) -> Self {
        Self { transport, cache, timeout }
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    /// Cached record for an origin, without touching the network.
    pub fn cached(&self, origin_url: &str) -> Result<Option<CacheRecord>, Error> {
        let origin = Origin::parse(origin_url)?;
        Ok(self.cache.get(origin.key()))
    }

    /// Resolve one origin.
    ///
    /// # Errors
    ///
    /// Only `Error::InvalidUrl`, when `origin_url` is not an http(s) URL.
    /// Every network or content failure ends in the placeholder instead.
    pub async fn resolve(&self, origin_url: &str) -> Result<CacheRecord, Error> {
        let origin = Origin::parse(origin_url)?;
        Ok(self.resolve_origin(&origin).await)
    }

    /// Resolve many origins concurrently. Output order matches input order.
    ///
    /// All inputs are validated before any fetch starts.
    pub async fn resolve_many<S: AsRef<str>>(&self, origin_urls: &[S]) -> Result<Vec<CacheRecord>, Error> {
        let origins = origin_urls
            .iter()
            .map(|u| Origin::parse(u.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.resolve_origins(&origins).await)
    }

    /// Drop every cached icon.
    pub async fn clear(&self) {
        self.cache.clear().await;
        tracing::info!("favicon cache cleared");
    }

    /// Clear the cache, then re-resolve every origin that was in it.
    ///
    /// The cache is empty before the first fetch is issued. Records come back
    /// sorted by key.
    pub async fn reset_and_refetch_all(&self) -> Vec<CacheRecord> {
        let previous = self.cache.take_all().await;

        let origins: Vec<Origin> = previous
            .iter()
            .filter_map(|record| match Origin::parse(&record.origin) {
                Ok(origin) => Some(origin),
                Err(e) => {
                    tracing::warn!(key = %record.key, origin = %record.origin, error = %e, "dropping unparseable origin");
                    None
                }
            })
            .collect();

        tracing::info!(count = origins.len(), "refetching favicons");
        self.resolve_origins(&origins).await
    }

    async fn resolve_origins(&self, origins: &[Origin]) -> Vec<CacheRecord> {
        join_all(origins.iter().map(|origin| self.resolve_origin(origin))).await
    }

    async fn resolve_origin(&self, origin: &Origin) -> CacheRecord {
        if let Some(record) = self.cache.get(origin.key()) {
            tracing::debug!(key = %origin.key(), "favicon cache hit");
            return record;
        }

        let data = match self.from_well_known(origin).await {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(origin = origin.as_str(), transport = e.is_transport(), error = %e, "favicon.ico unusable");
                match self.from_index(origin).await {
                    Ok(data) => data,
                    Err(e) => {
                        tracing::info!(origin = origin.as_str(), error = %e, "no favicon found, storing placeholder");
                        NO_IMAGE.to_string()
                    }
                }
            }
        };

        let record = CacheRecord::new(origin.key().clone(), origin.as_str(), Payload::InlineImage(data));
        self.cache.put(record).await
    }

    async fn from_well_known(&self, origin: &Origin) -> Result<String, Error> {
        let url = Url::parse(&origin.join("favicon.ico")).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        self.fetch_image(&url).await
    }

    async fn from_index(&self, origin: &Origin) -> Result<String, Error> {
        let response = self.transport.fetch(origin.url(), self.timeout).await?;
        response.expect_kind(ContentKind::Text)?;

        let html = to_text(&response.bytes);
        let href = find_icon_href(&html)
            .ok_or_else(|| Error::NotFound(format!("no icon link on {}", origin.as_str())))?;

        let icon_url = resolve_icon_href(origin, &href)?;
        tracing::debug!(origin = origin.as_str(), icon = %icon_url, "found icon link");

        self.fetch_image(&icon_url).await
    }

    async fn fetch_image(&self, url: &Url) -> Result<String, Error> {
        let response = self.transport.fetch(url, self.timeout).await?;
        response.expect_kind(ContentKind::Image)?;
        Ok(to_inline_image(response.content_type.as_deref(), &response.bytes))
    }
}
