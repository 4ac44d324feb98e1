//! Rotating pools of provider access tokens.
//!
//! Each provider owns an ordered list of opaque tokens. Selection is uniform
//! random over whatever is currently in the pool; tokens the provider rejects
//! are ejected in place, so a pool only ever shrinks unless tokens are appended.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Upstream services that hand out per-token request quotas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    /// OMDb ratings API.
    Omdb,
    /// Douban movie API.
    Douban,
    /// Douban search endpoint; only a subset of Douban keys are accepted there.
    DoubanSearch,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Omdb => "omdb",
            Provider::Douban => "douban",
            Provider::DoubanSearch => "douban-search",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "omdb" => Ok(Provider::Omdb),
            "douban" => Ok(Provider::Douban),
            "douban-search" | "douban_search" => Ok(Provider::DoubanSearch),
            other => Err(Error::InvalidInput(format!("unknown provider: {other}"))),
        }
    }
}

/// Process-wide token pools, one per provider.
#[derive(Debug, Default)]
pub struct CredentialPool {
    pools: Mutex<HashMap<Provider, Vec<String>>>,
}

impl CredentialPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pool pre-filled for each provider. Duplicates collapse.
    pub fn with_tokens<I, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Provider, Vec<T>)>,
        T: Into<String>,
    {
        let pool = Self::new();
        for (provider, tokens) in entries {
            pool.append_tokens(provider, tokens);
        }
        pool
    }

    /// Pick a token uniformly at random.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoCredentials` when the provider's pool is empty.
    pub fn select_token(&self, provider: Provider) -> Result<String, Error> {
        let pools = self.pools.lock();
        let tokens = pools
            .get(&provider)
            .filter(|t| !t.is_empty())
            .ok_or(Error::NoCredentials(provider))?;
        let index = rand::rng().random_range(0..tokens.len());
        Ok(tokens[index].clone())
    }

    /// Remove the first token equal to `token`. Returns whether anything was removed.
    pub fn eject_token(&self, provider: Provider, token: &str) -> bool {
        let mut pools = self.pools.lock();
        let Some(tokens) = pools.get_mut(&provider) else {
            return false;
        };
        match tokens.iter().position(|t| t == token) {
            Some(index) => {
                tokens.remove(index);
                tracing::warn!(provider = %provider, remaining = tokens.len(), "ejected rejected token");
                true
            }
            None => false,
        }
    }

    /// Append tokens not already present. Empty strings are skipped.
    ///
    /// Returns how many tokens were actually added.
    pub fn append_tokens<I, T>(&self, provider: Provider, tokens: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut pools = self.pools.lock();
        let pool = pools.entry(provider).or_default();
        let mut added = 0;
        for token in tokens {
            let token = token.into();
            if token.is_empty() || pool.contains(&token) {
                continue;
            }
            pool.push(token);
            added += 1;
        }
        if added > 0 {
            tracing::info!(provider = %provider, added, size = pool.len(), "appended tokens");
        }
        added
    }

    pub fn len(&self, provider: Provider) -> usize {
        self.pools.lock().get(&provider).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, provider: Provider) -> bool {
        self.len(provider) == 0
    }

    /// Snapshot of a provider's tokens in pool order.
    pub fn tokens(&self, provider: Provider) -> Vec<String> {
        self.pools.lock().get(&provider).cloned().unwrap_or_default()
    }
}
