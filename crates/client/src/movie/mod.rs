//! Movie metadata and ratings lookups against rate-limited providers.
//!
//! Pooled lookups pick a random token, and when the provider answers with an
//! application-level error they eject that token and try again with another,
//! up to `max_attempts` requests. Transport failures are returned at once.
//! Successful answers land in a per-namespace [`RecordCache`].
//!
//! Cache misses are guarded by an [`InFlight`] set keyed by the
//! credential-free request target: a concurrent duplicate is rejected, not joined.

pub mod id;
pub mod in_flight;
pub mod rejection;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use beacon_core::{AppConfig, CacheRecord, CredentialPool, DurableStore, Error, Payload, Provider, RecordCache, ResolutionKey};

use crate::fetch::Transport;

pub use id::MovieId;
pub use in_flight::{InFlight, InFlightGuard};
pub use rejection::rejection;

pub const BASE_NAMESPACE: &str = "movie-info.base";
pub const RATINGS_NAMESPACE: &str = "movie-info.ratings";
pub const DOUBAN_IMDB_NAMESPACE: &str = "movie-info.douban-imdb";

/// Title used to probe whether a token is accepted.
const PROBE_IMDB_ID: &str = "tt0111161";

/// Provider endpoints and request limits.
#[derive(Debug, Clone)]
pub struct MovieApiConfig {
    pub douban_api_url: String,
    pub omdb_api_url: String,
    pub omit_api_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Upper bound on requests per rotation loop.
    pub max_attempts: u32,
}

impl Default for MovieApiConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for MovieApiConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            douban_api_url: config.douban_api_url.clone(),
            omdb_api_url: config.omdb_api_url.clone(),
            omit_api_url: config.omit_api_url.clone(),
            timeout: config.provider_timeout(),
            max_attempts: config.max_attempts,
        }
    }
}

/// Cache namespaces used by the movie service.
#[derive(Debug)]
pub struct MovieCaches {
    /// Metadata keyed by IMDb or Douban id.
    pub base: RecordCache,
    /// Ratings keyed by IMDb id.
    pub ratings: RecordCache,
    /// IMDb ids keyed by Douban id.
    pub douban_imdb: RecordCache,
}

impl MovieCaches {
    pub async fn load(store: Arc<dyn DurableStore>) -> Self {
        Self {
            base: RecordCache::load(store.clone(), BASE_NAMESPACE).await,
            ratings: RecordCache::load(store.clone(), RATINGS_NAMESPACE).await,
            douban_imdb: RecordCache::load(store, DOUBAN_IMDB_NAMESPACE).await,
        }
    }
}

fn endpoint(base: &str, path: &str, query: &[(&str, &str)]) -> Result<Url, Error> {
    let raw = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    let mut url = Url::parse(&raw).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

fn with_token(target: &Url, token: &str) -> Url {
    let mut url = target.clone();
    url.query_pairs_mut().append_pair("apikey", token);
    url
}

/// Movie metadata, ratings and id mapping with credential rotation.
pub struct MovieInfoService {
    transport: Arc<dyn Transport>,
    pool: Arc<CredentialPool>,
    caches: MovieCaches,
    in_flight: InFlight,
    config: MovieApiConfig,
}

impl MovieInfoService {
    pub fn new(
        transport: Arc<dyn Transport>, pool: Arc<CredentialPool>, caches: MovieCaches, config: MovieApiConfig,
    ) -> Self {
        Self { transport, pool, caches, in_flight: InFlight::new(), config }
    }

    pub fn pool(&self) -> &CredentialPool {
        &self.pool
    }

    pub fn caches(&self) -> &MovieCaches {
        &self.caches
    }

    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// Metadata for an IMDb (`tt…`) or Douban (numeric) id.
    ///
    /// # Errors
    ///
    /// `InvalidIdentifier` before any network call when `id` matches neither
    /// shape; `DuplicateInFlight` when the same lookup is already running;
    /// otherwise whatever the rotation loop surfaces.
    pub async fn lookup_movie_by_id(&self, id: &str) -> Result<CacheRecord, Error> {
        let id = MovieId::parse(id)?;
        let key = ResolutionKey::new(id.as_str());
        if let Some(record) = self.caches.base.get(&key) {
            return Ok(record);
        }

        let path = match &id {
            MovieId::Imdb(imdb) => format!("movie/imdb/{imdb}"),
            MovieId::Douban(douban) => format!("movie/subject/{douban}"),
        };
        let target = endpoint(&self.config.douban_api_url, &path, &[])?;

        let _guard = self.in_flight.begin(target.as_str())?;
        let body = self.rotate(Provider::Douban, &target).await?;

        let record = CacheRecord::new(key, id.to_string(), Payload::Metadata(body));
        Ok(self.caches.base.put(record).await)
    }

    /// OMDb ratings (including Rotten Tomatoes) for an IMDb id.
    pub async fn lookup_ratings(&self, imdb_id: &str) -> Result<CacheRecord, Error> {
        let id = MovieId::parse_imdb(imdb_id)?;
        let key = ResolutionKey::new(id.as_str());
        if let Some(record) = self.caches.ratings.get(&key) {
            return Ok(record);
        }

        let target = endpoint(&self.config.omdb_api_url, "", &[("i", id.as_str()), ("tomatoes", "true")])?;

        let _guard = self.in_flight.begin(target.as_str())?;
        let body = self.rotate(Provider::Omdb, &target).await?;

        let record = CacheRecord::new(key, id.to_string(), Payload::Ratings(body));
        Ok(self.caches.ratings.put(record).await)
    }

    /// Map a Douban id to its IMDb id through the mapping service.
    pub async fn imdb_id_from_douban(&self, douban_id: &str) -> Result<CacheRecord, Error> {
        let id = MovieId::parse_douban(douban_id)?;
        let key = ResolutionKey::new(id.as_str());
        if let Some(record) = self.caches.douban_imdb.get(&key) {
            return Ok(record);
        }

        let target = endpoint(&self.config.omit_api_url, &format!("movie/{id}/douban/imdb"), &[])?;

        let _guard = self.in_flight.begin(target.as_str())?;
        let body = self.fetch_json(&target).await?;

        let imdb_id = body
            .get("data")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::ProviderRejection { provider: "omit".into(), message: body.to_string() })?;

        tracing::debug!(douban = %id, imdb = imdb_id, "mapped douban id");
        let record = CacheRecord::new(key, id.to_string(), Payload::ImdbId(imdb_id.to_string()));
        Ok(self.caches.douban_imdb.put(record).await)
    }

    /// Free-text Douban search. Results are not cached.
    pub async fn search_douban(&self, query: &str, count: u8) -> Result<Value, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("query cannot be empty".into()));
        }
        let count = count.clamp(1, 100).to_string();

        let target = endpoint(&self.config.douban_api_url, "movie/search", &[("q", query), ("count", count.as_str())])?;
        let body = self.rotate(Provider::DoubanSearch, &target).await?;

        if body.get("subjects").is_none() {
            return Err(Error::ProviderRejection {
                provider: Provider::DoubanSearch.to_string(),
                message: "response has no subjects".into(),
            });
        }
        Ok(body)
    }

    /// Add tokens to a provider's pool. Returns how many were new.
    pub fn append_credentials<I, T>(&self, provider: Provider, tokens: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.pool.append_tokens(provider, tokens)
    }

    /// Probe whether `token` is accepted by `provider`. The pool is not touched.
    ///
    /// # Errors
    ///
    /// `ProviderRejection` when the provider refuses the token; transport
    /// errors as they occur.
    pub async fn verify_credential(&self, provider: Provider, token: &str) -> Result<(), Error> {
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::InvalidInput("token cannot be empty".into()));
        }

        match provider {
            Provider::Omdb => {
                let url = endpoint(
                    &self.config.omdb_api_url,
                    "",
                    &[("i", PROBE_IMDB_ID), ("apikey", token), ("tomatoes", "true")],
                )?;
                let body = self.fetch_json(&url).await?;
                match rejection(provider, &body) {
                    Some(message) => Err(Error::ProviderRejection { provider: provider.to_string(), message }),
                    None => Ok(()),
                }
            }
            Provider::Douban | Provider::DoubanSearch => {
                let url = endpoint(
                    &self.config.douban_api_url,
                    &format!("movie/imdb/{PROBE_IMDB_ID}"),
                    &[("apikey", token)],
                )?;
                let body = self.fetch_json(&url).await?;
                if body.get("title").is_some() {
                    return Ok(());
                }
                let message = rejection(provider, &body).unwrap_or_else(|| "response has no title".to_string());
                Err(Error::ProviderRejection { provider: provider.to_string(), message })
            }
        }
    }

    /// Request `target` with pooled tokens until the provider accepts one.
    async fn rotate(&self, provider: Provider, target: &Url) -> Result<Value, Error> {
        let mut attempts = 0u32;
        loop {
            let token = self.pool.select_token(provider)?;
            let body = self.fetch_json(&with_token(target, &token)).await?;

            let Some(message) = rejection(provider, &body) else {
                tracing::debug!(provider = %provider, attempts = attempts + 1, "provider accepted request");
                return Ok(body);
            };

            attempts += 1;
            self.pool.eject_token(provider, &token);
            tracing::warn!(provider = %provider, attempt = attempts, error = %message, "provider rejected token");

            if attempts >= self.config.max_attempts {
                return Err(Error::RetryBudgetExhausted { attempts, last: message });
            }
        }
    }

    async fn fetch_json(&self, url: &Url) -> Result<Value, Error> {
        let response = self.transport.fetch(url, self.config.timeout).await?;
        response.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Reply, StubTransport};
    use beacon_core::MemoryStore;
    use serde_json::json;

    const RATINGS_URL: &str = "https://www.omdbapi.com/?i=tt0111161&tomatoes=true";
    const OMIT_URL: &str = "https://omit.mkrobot.org/movie/1292052/douban/imdb";

    fn tokens(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("key{i}")).collect()
    }

    fn omdb_error() -> Reply {
        Reply::json(json!({ "Response": "False", "Error": "Request limit reached!" }))
    }

    fn ratings() -> Value {
        json!({ "Title": "The Shawshank Redemption", "imdbRating": "9.3", "Response": "True" })
    }

    async fn service_with(stub: StubTransport, pool: CredentialPool) -> (MovieInfoService, Arc<StubTransport>) {
        let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::new());
        let stub = Arc::new(stub);
        let caches = MovieCaches::load(store).await;
        let service = MovieInfoService::new(stub.clone(), Arc::new(pool), caches, MovieApiConfig::default());
        (service, stub)
    }

    #[tokio::test]
    async fn test_ratings_rotate_past_four_rejections() {
        let stub = StubTransport::new()
            .route(RATINGS_URL, omdb_error())
            .route(RATINGS_URL, omdb_error())
            .route(RATINGS_URL, omdb_error())
            .route(RATINGS_URL, omdb_error())
            .route(RATINGS_URL, Reply::json(ratings()));
        let pool = CredentialPool::with_tokens([(Provider::Omdb, tokens(10))]);
        let (service, stub) = service_with(stub, pool).await;

        let record = service.lookup_ratings("tt0111161").await.unwrap();

        assert_eq!(record.payload, Payload::Ratings(ratings()));
        assert_eq!(service.pool().len(Provider::Omdb), 6);
        assert_eq!(stub.call_count(), 5);

        let used = stub.api_keys();
        let remaining = service.pool().tokens(Provider::Omdb);
        for rejected in &used[..4] {
            assert!(!remaining.contains(rejected));
        }
        assert!(remaining.contains(&used[4]));
    }

    #[tokio::test]
    async fn test_ratings_budget_exhausted_after_five_rejections() {
        let stub = StubTransport::new().route(RATINGS_URL, omdb_error());
        let pool = CredentialPool::with_tokens([(Provider::Omdb, tokens(10))]);
        let (service, stub) = service_with(stub, pool).await;

        let result = service.lookup_ratings("tt0111161").await;

        match result {
            Err(Error::RetryBudgetExhausted { attempts, last }) => {
                assert_eq!(attempts, 5);
                assert_eq!(last, "Request limit reached!");
            }
            other => panic!("expected RetryBudgetExhausted, got {other:?}"),
        }
        assert_eq!(service.pool().len(Provider::Omdb), 5);
        assert_eq!(stub.call_count(), 5);
        assert!(service.caches().ratings.is_empty());
    }

    #[tokio::test]
    async fn test_rotation_stops_when_pool_runs_dry() {
        let stub = StubTransport::new().route(RATINGS_URL, omdb_error());
        let pool = CredentialPool::with_tokens([(Provider::Omdb, tokens(2))]);
        let (service, stub) = service_with(stub, pool).await;

        let result = service.lookup_ratings("tt0111161").await;

        assert!(matches!(result, Err(Error::NoCredentials(Provider::Omdb))));
        assert_eq!(stub.call_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_pool_fails_without_request() {
        let (service, stub) = service_with(StubTransport::new(), CredentialPool::new()).await;

        let result = service.lookup_ratings("tt0111161").await;
        assert!(matches!(result, Err(Error::NoCredentials(Provider::Omdb))));
        assert_eq!(stub.call_count(), 0);
        assert!(service.in_flight().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_rotated() {
        let stub = StubTransport::new().route(RATINGS_URL, Reply::Timeout);
        let pool = CredentialPool::with_tokens([(Provider::Omdb, tokens(3))]);
        let (service, stub) = service_with(stub, pool).await;

        let result = service.lookup_ratings("tt0111161").await;

        assert!(matches!(result, Err(Error::Timeout(_))));
        assert_eq!(service.pool().len(Provider::Omdb), 3);
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_body_is_not_rotated() {
        let stub = StubTransport::new().route(RATINGS_URL, Reply::html("<html>maintenance</html>"));
        let pool = CredentialPool::with_tokens([(Provider::Omdb, tokens(3))]);
        let (service, _) = service_with(stub, pool).await;

        assert!(matches!(service.lookup_ratings("tt0111161").await, Err(Error::Decode(_))));
        assert_eq!(service.pool().len(Provider::Omdb), 3);
    }

    #[tokio::test]
    async fn test_ratings_are_cached() {
        let stub = StubTransport::new().route(RATINGS_URL, Reply::json(ratings()));
        let pool = CredentialPool::with_tokens([(Provider::Omdb, tokens(1))]);
        let (service, stub) = service_with(stub, pool).await;

        let first = service.lookup_ratings("tt0111161").await.unwrap();
        let second = service.lookup_ratings("tt0111161").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_identifier_makes_no_request() {
        let pool = CredentialPool::with_tokens([(Provider::Omdb, tokens(1)), (Provider::Douban, tokens(1))]);
        let (service, stub) = service_with(StubTransport::new(), pool).await;

        assert!(matches!(service.lookup_movie_by_id("abc").await, Err(Error::InvalidIdentifier(_))));
        assert!(matches!(service.lookup_ratings("1292052").await, Err(Error::InvalidIdentifier(_))));
        assert!(matches!(service.imdb_id_from_douban("tt0111161").await, Err(Error::InvalidIdentifier(_))));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_lookup_movie_by_imdb_and_douban_id() {
        let by_imdb = json!({ "title": "肖申克的救赎", "id": "1292052" });
        let by_subject = json!({ "title": "霸王别姬", "id": "1291546" });
        let stub = StubTransport::new()
            .route("https://api.douban.com/v2/movie/imdb/tt0111161", Reply::json(by_imdb.clone()))
            .route("https://api.douban.com/v2/movie/subject/1291546", Reply::json(by_subject.clone()));
        let pool = CredentialPool::with_tokens([(Provider::Douban, tokens(2))]);
        let (service, stub) = service_with(stub, pool).await;

        let record = service.lookup_movie_by_id("tt0111161").await.unwrap();
        assert_eq!(record.payload, Payload::Metadata(by_imdb));
        assert_eq!(record.key.as_str(), "tt0111161");

        let record = service.lookup_movie_by_id("1291546").await.unwrap();
        assert_eq!(record.payload, Payload::Metadata(by_subject));

        service.lookup_movie_by_id("1291546").await.unwrap();
        assert_eq!(stub.call_count(), 2);
        assert_eq!(service.caches().base.len(), 2);
    }

    #[tokio::test]
    async fn test_douban_rejection_rotates() {
        let url = "https://api.douban.com/v2/movie/subject/1291546";
        let stub = StubTransport::new()
            .route(url, Reply::json(json!({ "msg": "invalid_apikey", "code": 104 })))
            .route(url, Reply::json(json!({ "title": "霸王别姬" })));
        let pool = CredentialPool::with_tokens([(Provider::Douban, tokens(3))]);
        let (service, _) = service_with(stub, pool).await;

        service.lookup_movie_by_id("1291546").await.unwrap();
        assert_eq!(service.pool().len(Provider::Douban), 2);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_is_rejected() {
        let stub = StubTransport::new()
            .with_delay(Duration::from_millis(50))
            .route(OMIT_URL, Reply::json(json!({ "data": "tt0111161" })));
        let (service, stub) = service_with(stub, CredentialPool::new()).await;

        let (a, b) = tokio::join!(service.imdb_id_from_douban("1292052"), service.imdb_id_from_douban("1292052"));

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(outcomes.iter().filter(|r| matches!(r, Err(Error::DuplicateInFlight(_)))).count(), 1);
        assert_eq!(stub.call_count(), 1);
        assert!(service.in_flight().is_empty());
    }

    #[tokio::test]
    async fn test_in_flight_released_after_failure() {
        let (service, stub) = service_with(StubTransport::new(), CredentialPool::new()).await;

        assert!(matches!(service.imdb_id_from_douban("1292052").await, Err(Error::Transport(_))));
        assert!(service.in_flight().is_empty());
        assert!(service.imdb_id_from_douban("1292052").await.is_err());
        assert_eq!(stub.call_count(), 2);
    }

    #[tokio::test]
    async fn test_douban_to_imdb_mapping() {
        let stub = StubTransport::new().route(OMIT_URL, Reply::json(json!({ "data": "tt0111161" })));
        let (service, _) = service_with(stub, CredentialPool::new()).await;

        let record = service.imdb_id_from_douban("1292052").await.unwrap();
        assert_eq!(record.payload, Payload::ImdbId("tt0111161".into()));
        assert_eq!(service.caches().douban_imdb.len(), 1);
    }

    #[tokio::test]
    async fn test_douban_to_imdb_without_data() {
        let stub = StubTransport::new().route(OMIT_URL, Reply::json(json!({ "message": "not found" })));
        let (service, _) = service_with(stub, CredentialPool::new()).await;

        let result = service.imdb_id_from_douban("1292052").await;
        assert!(matches!(result, Err(Error::ProviderRejection { provider, .. }) if provider == "omit"));
        assert!(service.caches().douban_imdb.is_empty());
    }

    #[tokio::test]
    async fn test_search_uses_search_pool() {
        let url = "https://api.douban.com/v2/movie/search?q=shawshank&count=5";
        let stub = StubTransport::new().route(url, Reply::json(json!({ "subjects": [{ "id": "1292052" }] })));
        let pool = CredentialPool::with_tokens([(Provider::DoubanSearch, vec!["search-key"])]);
        let (service, stub) = service_with(stub, pool).await;

        let body = service.search_douban("shawshank", 5).await.unwrap();
        assert_eq!(body["subjects"][0]["id"], "1292052");
        assert_eq!(stub.api_keys(), vec!["search-key"]);
    }

    #[tokio::test]
    async fn test_search_without_subjects() {
        let url = "https://api.douban.com/v2/movie/search?q=x&count=5";
        let stub = StubTransport::new().route(url, Reply::json(json!({ "total": 0 })));
        let pool = CredentialPool::with_tokens([(Provider::DoubanSearch, vec!["search-key"])]);
        let (service, _) = service_with(stub, pool).await;

        assert!(matches!(service.search_douban("x", 5).await, Err(Error::ProviderRejection { .. })));
        assert!(matches!(service.search_douban("  ", 5).await, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_verify_omdb_credential() {
        let stub = StubTransport::new().route(RATINGS_URL, Reply::json(ratings()));
        let (service, stub) = service_with(stub, CredentialPool::new()).await;

        service.verify_credential(Provider::Omdb, "good-key").await.unwrap();
        assert_eq!(stub.api_keys(), vec!["good-key"]);
        assert!(service.pool().is_empty(Provider::Omdb));
    }

    #[tokio::test]
    async fn test_verify_rejected_credential() {
        let stub = StubTransport::new()
            .route(RATINGS_URL, Reply::json(json!({ "Error": "Invalid API key!" })))
            .route(
                "https://api.douban.com/v2/movie/imdb/tt0111161",
                Reply::json(json!({ "msg": "invalid_apikey", "code": 104 })),
            );
        let pool = CredentialPool::with_tokens([(Provider::Omdb, vec!["bad-key"])]);
        let (service, _) = service_with(stub, pool).await;

        let result = service.verify_credential(Provider::Omdb, "bad-key").await;
        assert!(matches!(result, Err(Error::ProviderRejection { message, .. }) if message == "Invalid API key!"));
        assert_eq!(service.pool().len(Provider::Omdb), 1);

        let result = service.verify_credential(Provider::Douban, "bad-key").await;
        assert!(matches!(result, Err(Error::ProviderRejection { .. })));
    }

    #[tokio::test]
    async fn test_verify_douban_credential() {
        let stub = StubTransport::new()
            .route("https://api.douban.com/v2/movie/imdb/tt0111161", Reply::json(json!({ "title": "肖申克的救赎" })));
        let (service, _) = service_with(stub, CredentialPool::new()).await;

        assert!(service.verify_credential(Provider::Douban, "d-key").await.is_ok());
        assert!(matches!(service.verify_credential(Provider::Douban, " ").await, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_append_credentials() {
        let (service, _) = service_with(StubTransport::new(), CredentialPool::new()).await;
        assert_eq!(service.append_credentials(Provider::Omdb, ["a", "b"]), 2);
        assert_eq!(service.append_credentials(Provider::Omdb, ["b"]), 0);
        assert_eq!(service.pool().len(Provider::Omdb), 2);
    }

    #[tokio::test]
    async fn test_results_survive_reload() {
        let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::new());
        let stub = Arc::new(StubTransport::new().route(RATINGS_URL, Reply::json(ratings())));
        let pool = Arc::new(CredentialPool::with_tokens([(Provider::Omdb, tokens(1))]));

        let service =
            MovieInfoService::new(stub.clone(), pool.clone(), MovieCaches::load(store.clone()).await, MovieApiConfig::default());
        service.lookup_ratings("tt0111161").await.unwrap();

        let reloaded = MovieCaches::load(store).await;
        assert!(reloaded.ratings.contains(&ResolutionKey::new("tt0111161")));
    }

    #[test]
    fn test_endpoint_building() {
        let url = endpoint("https://www.omdbapi.com", "", &[("i", "tt1"), ("tomatoes", "true")]).unwrap();
        assert_eq!(url.as_str(), "https://www.omdbapi.com/?i=tt1&tomatoes=true");

        let url = endpoint("https://api.douban.com/v2/", "/movie/subject/1", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.douban.com/v2/movie/subject/1");

        let url = with_token(&url, "k");
        assert_eq!(url.as_str(), "https://api.douban.com/v2/movie/subject/1?apikey=k");
    }
}
