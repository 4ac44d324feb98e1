//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

fn validate_timeout(field: &str, ms: u64) -> Result<(), ConfigError> {
    if ms < 100 {
        return Err(invalid(field, "must be at least 100ms"));
    }
    if ms > 300_000 {
        return Err(invalid(field, "must not exceed 5 minutes (300000ms)"));
    }
    Ok(())
}

fn validate_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    match url::Url::parse(value) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => Ok(()),
        Ok(u) => Err(invalid(field, format!("unsupported scheme: {}", u.scheme()))),
        Err(e) => Err(invalid(field, e.to_string())),
    }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - a timeout is below 100ms or above 5 minutes
    /// - `max_attempts` is 0 or above 20
    /// - `user_agent` is empty
    /// - a provider base URL is not http(s)
    ///
    /// Returns `ConfigError::Missing` if `store_path` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        validate_timeout("favicon_timeout_ms", self.favicon_timeout_ms)?;
        validate_timeout("provider_timeout_ms", self.provider_timeout_ms)?;

        if self.max_attempts == 0 || self.max_attempts > 20 {
            return Err(invalid("max_attempts", "must be between 1 and 20"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::Missing {
                field: "store_path".into(),
                hint: "set BEACON_STORE_PATH to a writable file".into(),
            });
        }

        validate_base_url("douban_api_url", &self.douban_api_url)?;
        validate_base_url("omdb_api_url", &self.omdb_api_url)?;
        validate_base_url("omit_api_url", &self.omit_api_url)?;

        if self.omdb_api_keys.is_empty() {
            tracing::warn!("omdb_api_keys is empty; ratings lookups will fail until tokens are appended");
        }

        Ok(())
    }
}
