//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (BEACON_*)
//! 2. TOML config file (if BEACON_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::credentials::{CredentialPool, Provider};

mod validation;

pub use validation::ConfigError;

/// Environment variables (after the `BEACON_` prefix) holding token lists.
const KEY_LISTS: [&str; 3] = ["OMDB_API_KEYS", "DOUBAN_API_KEYS", "DOUBAN_SEARCH_API_KEYS"];

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (BEACON_*)
/// 2. TOML config file (if BEACON_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite file backing all cache namespaces.
    ///
    /// Set via BEACON_STORE_PATH environment variable.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Per-fetch timeout for favicon stages, in milliseconds.
    #[serde(default = "default_favicon_timeout_ms")]
    pub favicon_timeout_ms: u64,

    /// Per-fetch timeout for movie provider calls, in milliseconds.
    #[serde(default = "default_provider_timeout_ms")]
    pub provider_timeout_ms: u64,

    /// Upper bound on requests per credential-rotation loop.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_douban_api_url")]
    pub douban_api_url: String,

    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Douban-to-IMDb id mapping service.
    #[serde(default = "default_omit_api_url")]
    pub omit_api_url: String,

    /// Initial OMDb token pool.
    ///
    /// Set via BEACON_OMDB_API_KEYS environment variable (comma-separated).
    #[serde(default, deserialize_with = "list::deserialize")]
    pub omdb_api_keys: Vec<String>,

    /// Initial Douban token pool.
    #[serde(default, deserialize_with = "list::deserialize")]
    pub douban_api_keys: Vec<String>,

    /// Douban tokens accepted by the search endpoint.
    #[serde(default, deserialize_with = "list::deserialize")]
    pub douban_search_api_keys: Vec<String>,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./beacon-store.sqlite")
}

fn default_user_agent() -> String {
    "beacon/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_favicon_timeout_ms() -> u64 {
    5_000
}

fn default_provider_timeout_ms() -> u64 {
    3_000
}

fn default_max_attempts() -> u32 {
    5
}

fn default_douban_api_url() -> String {
    "https://api.douban.com/v2".into()
}

fn default_omdb_api_url() -> String {
    "https://www.omdbapi.com".into()
}

fn default_omit_api_url() -> String {
    "https://omit.mkrobot.org".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            favicon_timeout_ms: default_favicon_timeout_ms(),
            provider_timeout_ms: default_provider_timeout_ms(),
            max_attempts: default_max_attempts(),
            douban_api_url: default_douban_api_url(),
            omdb_api_url: default_omdb_api_url(),
            omit_api_url: default_omit_api_url(),
            omdb_api_keys: Vec::new(),
            douban_api_keys: Vec::new(),
            douban_search_api_keys: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn favicon_timeout(&self) -> Duration {
        Duration::from_millis(self.favicon_timeout_ms)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `BEACON_`
    /// 2. TOML file from `BEACON_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or parsed, or if
    /// validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("BEACON_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("BEACON_")
                .ignore(&["CONFIG_FILE", KEY_LISTS[0], KEY_LISTS[1], KEY_LISTS[2]])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        // Env would coerce an all-digit key to a number; take these verbatim.
        for field in KEY_LISTS {
            if let Ok(raw) = std::env::var(format!("BEACON_{field}")) {
                figment = figment.merge(Serialized::default(&field.to_lowercase(), raw));
            }
        }

        figment
    }

    /// Build the credential pools from the configured key lists.
    pub fn credential_pool(&self) -> CredentialPool {
        CredentialPool::with_tokens([
            (Provider::Omdb, self.omdb_api_keys.clone()),
            (Provider::Douban, self.douban_api_keys.clone()),
            (Provider::DoubanSearch, self.douban_search_api_keys.clone()),
        ])
    }
}

/// Key lists accept either a sequence or a comma-separated string, so they
/// can come from TOML arrays and from single environment variables alike.
mod list {
    use serde::{Deserialize, Deserializer};

    /// TOML numbers and digit-only keys arrive as scalars of any kind.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
    }

    impl Scalar {
        fn into_string(self) -> String {
            match self {
                Scalar::Text(s) => s,
                Scalar::Int(n) => n.to_string(),
                Scalar::Float(n) => n.to_string(),
            }
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seq(Vec<Scalar>),
        One(Scalar),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items: Vec<String> = match Raw::deserialize(deserializer)? {
            Raw::Seq(items) => items.into_iter().map(Scalar::into_string).collect(),
            Raw::One(csv) => csv.into_string().split(',').map(str::to_string).collect(),
        };
        Ok(items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }
}
