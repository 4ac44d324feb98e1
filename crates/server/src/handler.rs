//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use beacon_client::{
    FAVICON_NAMESPACE, FaviconResolver, FetchClient, FetchConfig, MovieApiConfig, MovieCaches, MovieInfoService,
    Transport,
};
use beacon_core::{AppConfig, DurableStore, Error, RecordCache, SqliteStore};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use crate::tools::credential::{self, CredentialAppendParams, CredentialVerifyParams};
use crate::tools::favicon::{self, FaviconResolveManyParams, FaviconResolveParams};
use crate::tools::movie::{self, DoubanToImdbParams, MovieLookupParams, MovieRatingsParams, MovieSearchParams};

/// The main MCP server handler for beacon.
#[derive(Clone)]
pub struct BeaconServer {
    favicons: Arc<FaviconResolver>,
    movies: Arc<MovieInfoService>,
    tool_router: ToolRouter<Self>,
}

impl BeaconServer {
    /// Open the durable store and HTTP client described by `config`.
    pub async fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let store: Arc<dyn DurableStore> = Arc::new(SqliteStore::open(&config.store_path).await?);
        let transport: Arc<dyn Transport> = Arc::new(FetchClient::new(FetchConfig::from(config))?);
        Ok(Self::build(config, store, transport).await)
    }

    /// Load every cache namespace from `store` and wire the services.
    pub async fn build(config: &AppConfig, store: Arc<dyn DurableStore>, transport: Arc<dyn Transport>) -> Self {
        let favicon_cache = Arc::new(RecordCache::load(store.clone(), FAVICON_NAMESPACE).await);
        let favicons = FaviconResolver::new(transport.clone(), favicon_cache, config.favicon_timeout());

        let pool = Arc::new(config.credential_pool());
        let movies = MovieInfoService::new(transport, pool, MovieCaches::load(store).await, MovieApiConfig::from(config));

        Self::new(favicons, movies)
    }
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl BeaconServer {
    pub fn new(favicons: FaviconResolver, movies: MovieInfoService) -> Self {
        Self { favicons: Arc::new(favicons), movies: Arc::new(movies), tool_router: Self::tool_router() }
    }

    #[tool(description = "Resolve a site's favicon to a data: URI. Tries /favicon.ico, then the icon link on the index page, then a placeholder. Cached per host.")]
    async fn favicon_resolve(&self, params: Parameters<FaviconResolveParams>) -> Result<CallToolResult, McpError> {
        favicon::resolve_impl(&self.favicons, params.0).await
    }

    #[tool(description = "Resolve favicons for several origins concurrently. Results keep input order.")]
    async fn favicon_resolve_many(
        &self, params: Parameters<FaviconResolveManyParams>,
    ) -> Result<CallToolResult, McpError> {
        favicon::resolve_many_impl(&self.favicons, params.0).await
    }

    #[tool(description = "Remove every cached favicon.")]
    async fn favicon_clear(&self) -> Result<CallToolResult, McpError> {
        favicon::clear_impl(&self.favicons).await
    }

    #[tool(description = "Clear the favicon cache and re-resolve every origin that was in it.")]
    async fn favicon_refresh_all(&self) -> Result<CallToolResult, McpError> {
        favicon::refresh_all_impl(&self.favicons).await
    }

    #[tool(description = "Look up movie metadata by IMDb id (tt…) or numeric Douban id.")]
    async fn movie_lookup(&self, params: Parameters<MovieLookupParams>) -> Result<CallToolResult, McpError> {
        movie::lookup_impl(&self.movies, params.0).await
    }

    #[tool(description = "Look up OMDb ratings, including Rotten Tomatoes, for an IMDb id.")]
    async fn movie_ratings(&self, params: Parameters<MovieRatingsParams>) -> Result<CallToolResult, McpError> {
        movie::ratings_impl(&self.movies, params.0).await
    }

    #[tool(description = "Map a numeric Douban id to its IMDb id.")]
    async fn movie_douban_to_imdb(&self, params: Parameters<DoubanToImdbParams>) -> Result<CallToolResult, McpError> {
        movie::douban_to_imdb_impl(&self.movies, params.0).await
    }

    #[tool(description = "Search Douban for movies by free text. Results are not cached.")]
    async fn movie_search(&self, params: Parameters<MovieSearchParams>) -> Result<CallToolResult, McpError> {
        movie::search_impl(&self.movies, params.0).await
    }

    #[tool(description = "Add API tokens to a provider's credential pool.")]
    async fn credential_append(&self, params: Parameters<CredentialAppendParams>) -> Result<CallToolResult, McpError> {
        credential::append_impl(&self.movies, params.0).await
    }

    #[tool(description = "Check whether a provider accepts an API token. The pool is left unchanged.")]
    async fn credential_verify(&self, params: Parameters<CredentialVerifyParams>) -> Result<CallToolResult, McpError> {
        credential::verify_impl(&self.movies, params.0).await
    }
}

impl ServerHandler for BeaconServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "beacon".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
