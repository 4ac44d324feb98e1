//! favicon_* tool implementations.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use beacon_client::FaviconResolver;
use beacon_client::favicon::is_placeholder;
use beacon_core::{CacheRecord, Error};

use super::json_result;

/// Parameters for the favicon_resolve tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FaviconResolveParams {
    /// Site origin, e.g. "https://example.com". A bare host is treated as https.
    pub origin: String,
}

/// Parameters for the favicon_resolve_many tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FaviconResolveManyParams {
    /// Site origins, resolved concurrently.
    pub origins: Vec<String>,
}

/// One resolved icon.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FaviconOutput {
    /// Cache key (host, plus port when non-default).
    pub key: String,
    /// Origin the icon was resolved for.
    pub origin: String,
    /// `data:` URI of the icon.
    pub data_uri: String,
    /// True when no icon was found and the placeholder was stored.
    pub placeholder: bool,
}

impl From<CacheRecord> for FaviconOutput {
    fn from(record: CacheRecord) -> Self {
        let placeholder = is_placeholder(&record);
        let data_uri = record.payload.as_inline_image().unwrap_or_default().to_string();
        Self { key: record.key.to_string(), origin: record.origin, data_uri, placeholder }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FaviconListOutput {
    pub favicons: Vec<FaviconOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FaviconClearOutput {
    /// Number of records removed.
    pub cleared: usize,
}

pub async fn resolve_impl(resolver: &FaviconResolver, params: FaviconResolveParams) -> Result<CallToolResult, McpError> {
    if params.origin.trim().is_empty() {
        return Err(Error::InvalidInput("origin cannot be empty".into()).into());
    }

    let record = resolver.resolve(&params.origin).await?;
    json_result(&FaviconOutput::from(record))
}

pub async fn resolve_many_impl(
    resolver: &FaviconResolver, params: FaviconResolveManyParams,
) -> Result<CallToolResult, McpError> {
    if params.origins.is_empty() {
        return Err(Error::InvalidInput("origins cannot be empty".into()).into());
    }

    let records = resolver.resolve_many(&params.origins).await?;
    json_result(&FaviconListOutput { favicons: records.into_iter().map(FaviconOutput::from).collect() })
}

pub async fn clear_impl(resolver: &FaviconResolver) -> Result<CallToolResult, McpError> {
    let cleared = resolver.cache().len();
    resolver.clear().await;
    json_result(&FaviconClearOutput { cleared })
}

pub async fn refresh_all_impl(resolver: &FaviconResolver) -> Result<CallToolResult, McpError> {
    let records = resolver.reset_and_refetch_all().await;
    json_result(&FaviconListOutput { favicons: records.into_iter().map(FaviconOutput::from).collect() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{favicons, output};
    use beacon_client::NO_IMAGE;
    use beacon_core::Payload;

    #[tokio::test]
    async fn test_resolve_offline_yields_placeholder() {
        let resolver = favicons().await;
        let params = FaviconResolveParams { origin: "https://example.com".into() };

        let result = resolve_impl(&resolver, params).await.unwrap();
        let out = output(&result);
        assert_eq!(out["key"], "example.com");
        assert_eq!(out["data_uri"], NO_IMAGE);
        assert_eq!(out["placeholder"], true);
    }

    #[tokio::test]
    async fn test_resolve_returns_cached_icon() {
        let resolver = favicons().await;
        let icon = "data:image/png;base64,iVBORw0KGgo=";
        resolver
            .cache()
            .put(CacheRecord::new("example.com", "https://example.com", Payload::InlineImage(icon.into())))
            .await;

        let result = resolve_impl(&resolver, FaviconResolveParams { origin: "example.com".into() })
            .await
            .unwrap();
        let out = output(&result);
        assert_eq!(out["data_uri"], icon);
        assert_eq!(out["placeholder"], false);
    }

    #[tokio::test]
    async fn test_resolve_rejects_bad_input() {
        let resolver = favicons().await;

        let err = resolve_impl(&resolver, FaviconResolveParams { origin: " ".into() }).await.unwrap_err();
        assert_eq!(err.code.0, -32602);

        let params = FaviconResolveManyParams { origins: vec!["https://a.example".into(), "ftp://b.example".into()] };
        let err = resolve_many_impl(&resolver, params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_many_keeps_order() {
        let resolver = favicons().await;
        let params = FaviconResolveManyParams { origins: vec!["https://b.example".into(), "https://a.example".into()] };

        let result = resolve_many_impl(&resolver, params).await.unwrap();
        let out = output(&result);
        assert_eq!(out["favicons"][0]["key"], "b.example");
        assert_eq!(out["favicons"][1]["key"], "a.example");
    }

    #[tokio::test]
    async fn test_clear_and_refresh() {
        let resolver = favicons().await;
        resolver.resolve("https://a.example").await.unwrap();
        resolver.resolve("https://b.example").await.unwrap();

        let out = output(&refresh_all_impl(&resolver).await.unwrap());
        assert_eq!(out["favicons"].as_array().unwrap().len(), 2);
        assert_eq!(resolver.cache().len(), 2);

        let out = output(&clear_impl(&resolver).await.unwrap());
        assert_eq!(out["cleared"], 2);
        assert!(resolver.cache().is_empty());
    }
}
