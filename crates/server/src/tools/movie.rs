//! movie_* tool implementations.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use beacon_client::MovieInfoService;
use beacon_core::{CacheRecord, Payload};

use super::json_result;

/// Parameters for the movie_lookup tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MovieLookupParams {
    /// IMDb id ("tt0111161") or numeric Douban id ("1292052").
    pub id: String,
}

/// Parameters for the movie_ratings tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MovieRatingsParams {
    /// IMDb id, e.g. "tt0111161".
    pub imdb_id: String,
}

/// Parameters for the movie_douban_to_imdb tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DoubanToImdbParams {
    /// Numeric Douban id.
    pub douban_id: String,
}

/// Parameters for the movie_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MovieSearchParams {
    /// Free-text query.
    pub query: String,

    /// Maximum number of results, 1-100 (default: 5).
    #[serde(default = "default_count")]
    pub count: u8,
}

fn default_count() -> u8 {
    5
}

/// Provider body for a metadata or ratings lookup.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MovieOutput {
    /// Identifier the record is cached under.
    pub id: String,
    /// Provider response body.
    pub data: Value,
}

impl From<CacheRecord> for MovieOutput {
    fn from(record: CacheRecord) -> Self {
        let data = match record.payload {
            Payload::Metadata(v) | Payload::Ratings(v) => v,
            Payload::ImdbId(s) | Payload::InlineImage(s) => Value::String(s),
        };
        Self { id: record.key.to_string(), data }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DoubanToImdbOutput {
    pub douban_id: String,
    pub imdb_id: String,
}

pub async fn lookup_impl(service: &MovieInfoService, params: MovieLookupParams) -> Result<CallToolResult, McpError> {
    let record = service.lookup_movie_by_id(&params.id).await?;
    json_result(&MovieOutput::from(record))
}

pub async fn ratings_impl(service: &MovieInfoService, params: MovieRatingsParams) -> Result<CallToolResult, McpError> {
    let record = service.lookup_ratings(&params.imdb_id).await?;
    json_result(&MovieOutput::from(record))
}

pub async fn douban_to_imdb_impl(
    service: &MovieInfoService, params: DoubanToImdbParams,
) -> Result<CallToolResult, McpError> {
    let record = service.imdb_id_from_douban(&params.douban_id).await?;
    let imdb_id = match &record.payload {
        Payload::ImdbId(id) => id.clone(),
        other => other.as_json().map(Value::to_string).unwrap_or_default(),
    };
    json_result(&DoubanToImdbOutput { douban_id: record.key.to_string(), imdb_id })
}

pub async fn search_impl(service: &MovieInfoService, params: MovieSearchParams) -> Result<CallToolResult, McpError> {
    let body = service.search_douban(&params.query, params.count).await?;
    json_result(&body)
}
